// Runtime configuration handed down from the bootstrap layer.

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
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
