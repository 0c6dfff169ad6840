use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing::{debug, warn};

use backend_domain::ports::{NotificationDispatcher, NotificationEvent};
use backend_domain::RuntimeConfig;

// Fire-and-forget webhook delivery. Dispatch spawns the send and returns;
// a failed delivery is logged, never surfaced to the state machine.
pub struct WebhookNotifier {
    config: RuntimeConfig,
}

impl WebhookNotifier {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }
}

impl NotificationDispatcher for WebhookNotifier {
    fn dispatch(&self, event: NotificationEvent) {
        let Some(url) = self.config.webhook_url.clone() else {
            debug!(
                tenant_id = %event.tenant_id,
                kind = event.kind.as_str(),
                "no webhook configured, dropping notification"
            );
            return;
        };
        let timeout = Duration::from_secs(self.config.request_timeout_seconds.max(3));
        tokio::spawn(async move {
            if let Err(err) = send_event(&url, timeout, &event).await {
                warn!(
                    tenant_id = %event.tenant_id,
                    kind = event.kind.as_str(),
                    "notification delivery failed: {}",
                    err
                );
            }
        });
    }
}

async fn send_event(url: &str, timeout: Duration, event: &NotificationEvent) -> Result<()> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    client
        .post(url)
        .json(&json!({
            "tenant_id": event.tenant_id,
            "event_type": event.kind.as_str(),
            "payload": event.payload,
        }))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
