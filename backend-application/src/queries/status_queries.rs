use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppError, AppState};
use backend_domain::services::lifecycle;
use backend_domain::{
    DocumentType,
    EligibilityStatus,
    TenantId,
    VerificationDocument,
};

#[derive(Debug, Serialize)]
pub struct VerificationStatusView {
    pub tenant_id: TenantId,
    pub name: String,
    pub student_count: Option<u32>,
    pub eligibility_status: EligibilityStatus,
    pub eligibility_deadline: Option<DateTime<Utc>>,
    pub documents: Vec<VerificationDocument>,
    // Reviewer notes the institution still has to act on.
    pub outstanding_notes: Option<String>,
    // Requested types that still lack a fresh submission.
    pub outstanding_types: Vec<DocumentType>,
}

pub async fn verification_status(
    state: &AppState,
    tenant_id: TenantId,
) -> Result<VerificationStatusView, AppError> {
    let tenant = state.tenant_repo.get(tenant_id).await?;
    let documents: Vec<_> = state
        .document_repo
        .list_for_tenant(tenant_id)
        .await?
        .into_iter()
        .filter(|d| !d.superseded)
        .collect();

    let mut outstanding_notes = None;
    let mut outstanding_types = Vec::new();

    if tenant.eligibility_status != EligibilityStatus::Approved {
        if let Some(review) = state
            .review_repo
            .list_for_tenant(tenant_id)
            .await?
            .into_iter()
            .last()
        {
            if !review.notes.trim().is_empty() {
                outstanding_notes = Some(review.notes.clone());
            }
        }
    }

    if tenant.eligibility_status == EligibilityStatus::RequiresMoreInfo {
        if let Some(info_request) = state.review_repo.latest_info_request(tenant_id).await? {
            let resubmitted: Vec<DocumentType> = documents
                .iter()
                .filter(|d| d.is_live() && d.uploaded_at > info_request.created_at)
                .map(|d| d.document_type)
                .collect();
            outstanding_types = lifecycle::outstanding_requested_types(
                &info_request.requested_types,
                &resubmitted,
            );
        }
    }

    Ok(VerificationStatusView {
        tenant_id: tenant.id,
        name: tenant.name,
        student_count: tenant.student_count,
        eligibility_status: tenant.eligibility_status,
        eligibility_deadline: tenant.eligibility_deadline,
        documents,
        outstanding_notes,
        outstanding_types,
    })
}
