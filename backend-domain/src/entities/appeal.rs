// Appeal entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AppealId, AppealStatus, DocumentId, EligibilityStatus, TenantId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appeal {
    pub id: AppealId,
    pub tenant_id: TenantId,
    // Snapshot of the eligibility status being appealed.
    pub original_decision: EligibilityStatus,
    pub reason: String,
    pub supporting_documents: Vec<DocumentId>,
    pub status: AppealStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub reviewed_by: Option<String>,
}

impl Appeal {
    pub fn open(
        tenant_id: TenantId,
        original_decision: EligibilityStatus,
        reason: String,
        supporting_documents: Vec<DocumentId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AppealId::generate(),
            tenant_id,
            original_decision,
            reason,
            supporting_documents,
            status: AppealStatus::Pending,
            submitted_at: now,
            reviewed_at: None,
            review_notes: None,
            reviewed_by: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}
