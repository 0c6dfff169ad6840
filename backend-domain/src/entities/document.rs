// Verification document entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{DocumentId, DocumentStatus, DocumentType, TenantId};

// Scores attached by the external document-analysis service, both in [0,1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub authenticity_score: f64,
    pub completeness_score: f64,
}

impl DocumentAnalysis {
    pub fn meets_quality_bar(&self) -> bool {
        self.authenticity_score >= 0.8 && self.completeness_score >= 0.8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationDocument {
    pub id: DocumentId,
    pub tenant_id: TenantId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub storage_url: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub analysis: Option<DocumentAnalysis>,
    // A resubmission of the same type marks the old row superseded
    // instead of deleting it.
    pub superseded: bool,
}

impl VerificationDocument {
    #[allow(clippy::too_many_arguments)]
    pub fn submitted(
        tenant_id: TenantId,
        document_type: DocumentType,
        file_name: String,
        storage_url: String,
        content_type: String,
        size_bytes: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DocumentId::generate(),
            tenant_id,
            document_type,
            file_name,
            storage_url,
            content_type,
            size_bytes,
            status: DocumentStatus::Pending,
            uploaded_at: now,
            reviewed_at: None,
            review_notes: None,
            analysis: None,
            superseded: false,
        }
    }

    // Live documents are the ones counted by the at-most-one-per-type
    // invariant and by risk scoring.
    pub fn is_live(&self) -> bool {
        !self.superseded && self.status != DocumentStatus::Rejected
    }
}
