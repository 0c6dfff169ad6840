use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::RuntimeConfig;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub admin_token: Option<String>,
    pub public_base_url: String,
    pub storage_dir: String,
    pub webhook_url: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub storage_timeout_seconds: u64,
    pub retry_backoff_ms: u64,
    pub detection_hour: u32,
    pub detection_minute: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8420".to_string(),
            admin_token: None,
            public_base_url: "http://127.0.0.1:8420".to_string(),
            storage_dir: "./uploads".to_string(),
            webhook_url: None,
            // Document limit is 10 MiB; the extra headroom covers
            // multipart framing so the limit check stays in one place.
            max_body_bytes: 12 * 1024 * 1024,
            request_timeout_seconds: 15,
            storage_timeout_seconds: 5,
            retry_backoff_ms: 25,
            detection_hour: 0,
            detection_minute: 10,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("ATTEST_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(admin_token) = &self.admin_token {
            if admin_token.trim().is_empty() {
                self.admin_token = None;
            }
        }
        if let Some(webhook_url) = &self.webhook_url {
            if webhook_url.trim().is_empty() {
                self.webhook_url = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.storage_dir = resolve_path(base, &self.storage_dir);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.public_base_url.trim().is_empty() {
            return Err(anyhow!("public_base_url must not be empty"));
        }
        if self.storage_dir.trim().is_empty() {
            return Err(anyhow!("storage_dir must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.storage_timeout_seconds == 0 {
            return Err(anyhow!("storage_timeout_seconds must be greater than 0"));
        }
        if self.detection_hour > 23 || self.detection_minute > 59 {
            return Err(anyhow!("detection_hour or detection_minute out of range"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            admin_token: self.admin_token.clone(),
            public_base_url: self.public_base_url.clone(),
            storage_dir: self.storage_dir.clone(),
            webhook_url: self.webhook_url.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            storage_timeout_seconds: self.storage_timeout_seconds,
            retry_backoff_ms: self.retry_backoff_ms,
            detection_hour: self.detection_hour,
            detection_minute: self.detection_minute,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ATTEST_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("ATTEST_ADMIN_TOKEN") {
            self.admin_token = Some(value);
        }
        if let Ok(value) = env::var("ATTEST_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("ATTEST_STORAGE_DIR") {
            self.storage_dir = value;
        }
        if let Ok(value) = env::var("ATTEST_WEBHOOK_URL") {
            self.webhook_url = Some(value);
        }
        if let Ok(value) = env::var("ATTEST_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("ATTEST_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("ATTEST_STORAGE_TIMEOUT_SECONDS") {
            self.storage_timeout_seconds = value.parse().unwrap_or(self.storage_timeout_seconds);
        }
        if let Ok(value) = env::var("ATTEST_RETRY_BACKOFF_MS") {
            self.retry_backoff_ms = value.parse().unwrap_or(self.retry_backoff_ms);
        }
        if let Ok(value) = env::var("ATTEST_DETECTION_HOUR") {
            self.detection_hour = value.parse().unwrap_or(self.detection_hour);
        }
        if let Ok(value) = env::var("ATTEST_DETECTION_MINUTE") {
            self.detection_minute = value.parse().unwrap_or(self.detection_minute);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        AppConfig::default().validate().expect("defaults valid");
    }

    #[test]
    fn blank_optional_fields_normalize_to_none() {
        let mut config = AppConfig {
            admin_token: Some("  ".to_string()),
            webhook_url: Some(String::new()),
            ..AppConfig::default()
        };
        config.normalize();
        assert!(config.admin_token.is_none());
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn out_of_range_detection_schedule_is_rejected() {
        let config = AppConfig {
            detection_hour: 24,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
