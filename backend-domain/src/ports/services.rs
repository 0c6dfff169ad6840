use async_trait::async_trait;
use serde::Serialize;

use crate::value_objects::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    DocumentSubmitted,
    StatusChanged,
    AppealOpened,
    AppealDecided,
    AppealInfoProvided,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::DocumentSubmitted => "DOCUMENT_SUBMITTED",
            NotificationKind::StatusChanged => "STATUS_CHANGED",
            NotificationKind::AppealOpened => "APPEAL_OPENED",
            NotificationKind::AppealDecided => "APPEAL_DECIDED",
            NotificationKind::AppealInfoProvided => "APPEAL_INFO_PROVIDED",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub tenant_id: TenantId,
    pub kind: NotificationKind,
    pub payload: serde_json::Value,
}

// Fire-and-forget: dispatch spawns delivery and returns immediately.
// Delivery guarantees are the dispatcher's concern, never the caller's;
// a transition must not hinge on a third party accepting the event.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, event: NotificationEvent);
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub url: String,
}

#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn store(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> anyhow::Result<StoredObject>;
}
