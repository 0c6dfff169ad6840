// Verification review entity
// Append-only: reviews are never mutated or deleted, they are the audit
// trail risk and anomaly computations read from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{DocumentType, ReviewAction, ReviewId, TenantId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReview {
    pub id: ReviewId,
    pub tenant_id: TenantId,
    pub action: ReviewAction,
    pub reviewer: String,
    pub notes: String,
    // Populated for REQUEST_MORE_INFO only: the document types the
    // institution must resubmit before returning to PENDING.
    pub requested_types: Vec<DocumentType>,
    pub created_at: DateTime<Utc>,
}

impl VerificationReview {
    pub fn record(
        tenant_id: TenantId,
        action: ReviewAction,
        reviewer: String,
        notes: String,
        requested_types: Vec<DocumentType>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReviewId::generate(),
            tenant_id,
            action,
            reviewer,
            notes,
            requested_types,
            created_at: now,
        }
    }
}
