use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::{AppError, AppState};
use backend_domain::services::lifecycle;
use backend_domain::{
    AuditAction,
    AuditEntry,
    DocumentStatus,
    DocumentType,
    NotificationEvent,
    NotificationKind,
    ReviewAction,
    StoreError,
    Tenant,
    TenantId,
    TransitionCommit,
    VerificationReview,
};

#[derive(Debug)]
pub struct ReviewRequest {
    pub action: ReviewAction,
    pub reviewer: String,
    pub notes: String,
    // Only meaningful for REQUEST_MORE_INFO: the types to resubmit.
    pub requested_types: Vec<DocumentType>,
}

pub async fn record_review(
    state: &AppState,
    tenant_id: TenantId,
    request: ReviewRequest,
) -> Result<Tenant, AppError> {
    lifecycle::validate_review_notes(request.action, &request.notes)?;

    let requested_types = if request.action == ReviewAction::RequestMoreInfo {
        request.requested_types.clone()
    } else {
        Vec::new()
    };

    let mut attempts = 0u32;
    let tenant = loop {
        let mut tenant = state.tenant_repo.get(tenant_id).await?;
        let next = lifecycle::review_transition(tenant.eligibility_status, request.action)?;

        let now = Utc::now();
        let review = VerificationReview::record(
            tenant.id,
            request.action,
            request.reviewer.clone(),
            request.notes.clone(),
            requested_types.clone(),
            now,
        );

        // A decision settles the pending documents along with the tenant.
        let mut documents = Vec::new();
        if let Some(doc_status) = match request.action {
            ReviewAction::Approve => Some(DocumentStatus::Approved),
            ReviewAction::Reject => Some(DocumentStatus::Rejected),
            ReviewAction::RequestMoreInfo => None,
        } {
            for doc in state.document_repo.list_for_tenant(tenant.id).await? {
                if !doc.superseded && doc.status == DocumentStatus::Pending {
                    let mut reviewed = doc;
                    reviewed.status = doc_status;
                    reviewed.reviewed_at = Some(now);
                    if !request.notes.trim().is_empty() {
                        reviewed.review_notes = Some(request.notes.clone());
                    }
                    documents.push(reviewed);
                }
            }
        }

        let expected_version = tenant.version;
        let previous_status = tenant.eligibility_status;
        tenant.eligibility_status = next;
        tenant.updated_at = now;
        tenant.version += 1;

        let audit = AuditEntry::new(
            tenant.id,
            AuditAction::ReviewRecorded,
            json!({
                "review_id": review.id,
                "action": request.action.as_str(),
                "from": previous_status.as_str(),
                "to": tenant.eligibility_status.as_str(),
            }),
            request.reviewer.clone(),
            now,
        );

        let commit = TransitionCommit {
            tenant,
            expected_version,
            review: Some(review),
            documents,
            appeal: None,
            audit,
        };

        match state.tenant_repo.commit_transition(commit).await {
            Ok(committed) => break committed,
            Err(StoreError::VersionConflict) if attempts == 0 => {
                attempts += 1;
                state.metrics.record_conflict_retry();
                debug!(tenant_id = %tenant_id, "review conflicted, retrying");
                tokio::time::sleep(Duration::from_millis(state.config.retry_backoff_ms)).await;
            }
            Err(err) => return Err(err.into()),
        }
    };

    state.metrics.record_review_recorded();
    state.notifier.dispatch(NotificationEvent {
        tenant_id: tenant.id,
        kind: NotificationKind::StatusChanged,
        payload: json!({
            "action": request.action.as_str(),
            "eligibility_status": tenant.eligibility_status.as_str(),
            "notes": request.notes,
        }),
    });

    Ok(tenant)
}
