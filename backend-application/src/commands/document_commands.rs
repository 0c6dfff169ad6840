use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::{AppError, AppState};
use backend_domain::services::lifecycle;
use backend_domain::{
    AuditAction,
    AuditEntry,
    DocumentType,
    EligibilityStatus,
    NotificationEvent,
    NotificationKind,
    StoreError,
    TenantId,
    TransitionCommit,
    VerificationDocument,
};

#[derive(Debug)]
pub struct SubmitDocumentRequest {
    pub tenant_id: TenantId,
    pub document_type: DocumentType,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub async fn submit_document(
    state: &AppState,
    request: SubmitDocumentRequest,
) -> Result<VerificationDocument, AppError> {
    lifecycle::validate_document_upload(request.bytes.len() as u64, &request.content_type)?;

    let tenant = state.tenant_repo.get(request.tenant_id).await?;
    lifecycle::submission_guard(tenant.eligibility_status)?;

    // The blob is written before the record so a commit retry can reuse it.
    // On any later failure no document row exists, only an orphan file.
    let stored = match tokio::time::timeout(
        Duration::from_secs(state.config.storage_timeout_seconds),
        state
            .document_storage
            .store(&request.file_name, &request.content_type, &request.bytes),
    )
    .await
    {
        Ok(Ok(stored)) => stored,
        Ok(Err(err)) => return Err(AppError::Storage(err.to_string())),
        Err(_) => return Err(AppError::Storage("document storage timed out".to_string())),
    };

    let mut attempts = 0u32;
    let (tenant, document) = loop {
        let mut tenant = state.tenant_repo.get(request.tenant_id).await?;
        lifecycle::submission_guard(tenant.eligibility_status)?;

        let now = Utc::now();
        let document = VerificationDocument::submitted(
            tenant.id,
            request.document_type,
            request.file_name.clone(),
            stored.url.clone(),
            request.content_type.clone(),
            request.bytes.len() as u64,
            now,
        );

        let existing = state.document_repo.list_for_tenant(tenant.id).await?;
        let mut documents = vec![document.clone()];
        for doc in &existing {
            if doc.is_live() && doc.document_type == request.document_type {
                let mut superseded = doc.clone();
                superseded.superseded = true;
                documents.push(superseded);
            }
        }

        let outstanding = outstanding_after_submission(state, &tenant, &existing, request.document_type).await?;

        let expected_version = tenant.version;
        let previous_status = tenant.eligibility_status;
        if let Some(next) = lifecycle::submission_transition(tenant.eligibility_status, outstanding)
        {
            tenant.eligibility_status = next;
        }
        tenant.updated_at = now;
        tenant.version += 1;

        let audit = AuditEntry::new(
            tenant.id,
            AuditAction::DocumentSubmitted,
            json!({
                "document_id": document.id,
                "document_type": document.document_type.as_str(),
                "file_name": document.file_name,
                "from": previous_status.as_str(),
                "to": tenant.eligibility_status.as_str(),
            }),
            "tenant",
            now,
        );

        let commit = TransitionCommit {
            tenant,
            expected_version,
            review: None,
            documents,
            appeal: None,
            audit,
        };

        match state.tenant_repo.commit_transition(commit).await {
            Ok(committed) => break (committed, document),
            Err(StoreError::VersionConflict) if attempts == 0 => {
                attempts += 1;
                state.metrics.record_conflict_retry();
                debug!(tenant_id = %request.tenant_id, "document submission conflicted, retrying");
                tokio::time::sleep(Duration::from_millis(state.config.retry_backoff_ms)).await;
            }
            Err(err) => return Err(err.into()),
        }
    };

    state.metrics.record_document_submitted();
    state.notifier.dispatch(NotificationEvent {
        tenant_id: tenant.id,
        kind: NotificationKind::DocumentSubmitted,
        payload: json!({
            "document_id": document.id,
            "document_type": document.document_type.as_str(),
            "eligibility_status": tenant.eligibility_status.as_str(),
        }),
    });

    Ok(document)
}

// True while some requested document type still lacks a fresh submission,
// counting the upload currently in flight.
async fn outstanding_after_submission(
    state: &AppState,
    tenant: &backend_domain::Tenant,
    existing: &[VerificationDocument],
    submitted_type: DocumentType,
) -> Result<bool, AppError> {
    if tenant.eligibility_status != EligibilityStatus::RequiresMoreInfo {
        return Ok(false);
    }
    let Some(info_request) = state.review_repo.latest_info_request(tenant.id).await? else {
        return Ok(false);
    };

    let mut resubmitted: Vec<DocumentType> = existing
        .iter()
        .filter(|d| d.is_live() && d.uploaded_at > info_request.created_at)
        .map(|d| d.document_type)
        .collect();
    resubmitted.push(submitted_type);

    let outstanding =
        lifecycle::outstanding_requested_types(&info_request.requested_types, &resubmitted);
    Ok(!outstanding.is_empty())
}
