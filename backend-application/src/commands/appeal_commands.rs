use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::{AppError, AppState};
use backend_domain::services::lifecycle;
use backend_domain::{
    Appeal,
    AppealDecision,
    AppealId,
    AuditAction,
    AuditEntry,
    DocumentId,
    EligibilityStatus,
    NotificationEvent,
    NotificationKind,
    StoreError,
    TenantId,
    TransitionCommit,
};

pub async fn open_appeal(
    state: &AppState,
    tenant_id: TenantId,
    reason: String,
    supporting_documents: Vec<DocumentId>,
) -> Result<Appeal, AppError> {
    // Referenced documents must exist and belong to the appellant.
    for document_id in &supporting_documents {
        let document = state.document_repo.get(*document_id).await?;
        if document.tenant_id != tenant_id {
            return Err(AppError::Validation(
                "supporting document does not belong to this institution".to_string(),
            ));
        }
    }

    let mut attempts = 0u32;
    let appeal = loop {
        let mut tenant = state.tenant_repo.get(tenant_id).await?;
        let open = state.appeal_repo.open_for_tenant(tenant_id).await?;
        lifecycle::appeal_open_guard(tenant.eligibility_status, open.is_some(), &reason)?;

        let now = Utc::now();
        let appeal = Appeal::open(
            tenant.id,
            tenant.eligibility_status,
            reason.trim().to_string(),
            supporting_documents.clone(),
            now,
        );

        let expected_version = tenant.version;
        tenant.updated_at = now;
        tenant.version += 1;

        let audit = AuditEntry::new(
            tenant.id,
            AuditAction::AppealOpened,
            json!({
                "appeal_id": appeal.id,
                "supporting_documents": appeal.supporting_documents,
            }),
            "tenant",
            now,
        );

        let commit = TransitionCommit {
            tenant,
            expected_version,
            review: None,
            documents: Vec::new(),
            appeal: Some(appeal.clone()),
            audit,
        };

        match state.tenant_repo.commit_transition(commit).await {
            Ok(_) => break appeal,
            Err(StoreError::VersionConflict) if attempts == 0 => {
                attempts += 1;
                state.metrics.record_conflict_retry();
                debug!(tenant_id = %tenant_id, "appeal submission conflicted, retrying");
                tokio::time::sleep(Duration::from_millis(state.config.retry_backoff_ms)).await;
            }
            Err(err) => return Err(err.into()),
        }
    };

    state.metrics.record_appeal_opened();
    state.notifier.dispatch(NotificationEvent {
        tenant_id,
        kind: NotificationKind::AppealOpened,
        payload: json!({ "appeal_id": appeal.id }),
    });

    Ok(appeal)
}

pub async fn decide_appeal(
    state: &AppState,
    appeal_id: AppealId,
    decision: AppealDecision,
    notes: String,
    reviewed_by: String,
) -> Result<Appeal, AppError> {
    lifecycle::validate_appeal_notes(decision, &notes)?;

    let mut attempts = 0u32;
    let appeal = loop {
        let mut appeal = state.appeal_repo.get(appeal_id).await?;
        let next_status = lifecycle::appeal_decision_transition(appeal.status, decision)?;
        let mut tenant = state.tenant_repo.get(appeal.tenant_id).await?;

        let now = Utc::now();
        appeal.status = next_status;
        appeal.reviewed_at = Some(now);
        appeal.reviewed_by = Some(reviewed_by.clone());
        if !notes.trim().is_empty() {
            appeal.review_notes = Some(notes.clone());
        }

        let expected_version = tenant.version;
        let previous_status = tenant.eligibility_status;
        // A granted appeal overturns the rejection; everything else leaves
        // the tenant where it was.
        if decision == AppealDecision::Approved {
            tenant.eligibility_status = EligibilityStatus::Approved;
        }
        tenant.updated_at = now;
        tenant.version += 1;

        let audit = AuditEntry::new(
            tenant.id,
            AuditAction::AppealDecided,
            json!({
                "appeal_id": appeal.id,
                "decision": decision.as_str(),
                "from": previous_status.as_str(),
                "to": tenant.eligibility_status.as_str(),
            }),
            reviewed_by.clone(),
            now,
        );

        let commit = TransitionCommit {
            tenant,
            expected_version,
            review: None,
            documents: Vec::new(),
            appeal: Some(appeal.clone()),
            audit,
        };

        match state.tenant_repo.commit_transition(commit).await {
            Ok(_) => break appeal,
            Err(StoreError::VersionConflict) if attempts == 0 => {
                attempts += 1;
                state.metrics.record_conflict_retry();
                debug!(appeal_id = %appeal_id, "appeal decision conflicted, retrying");
                tokio::time::sleep(Duration::from_millis(state.config.retry_backoff_ms)).await;
            }
            Err(err) => return Err(err.into()),
        }
    };

    state.metrics.record_appeal_decided();
    state.notifier.dispatch(NotificationEvent {
        tenant_id: appeal.tenant_id,
        kind: NotificationKind::AppealDecided,
        payload: json!({
            "appeal_id": appeal.id,
            "decision": decision.as_str(),
            "notes": notes,
        }),
    });

    Ok(appeal)
}

// Tenant-side answer to a MORE_INFO_REQUESTED appeal: attach whatever was
// asked for and put the appeal back in the review queue.
pub async fn provide_appeal_info(
    state: &AppState,
    appeal_id: AppealId,
    additional_documents: Vec<DocumentId>,
) -> Result<Appeal, AppError> {
    let mut attempts = 0u32;
    let appeal = loop {
        let mut appeal = state.appeal_repo.get(appeal_id).await?;
        appeal.status = lifecycle::appeal_info_transition(appeal.status)?;

        for document_id in &additional_documents {
            let document = state.document_repo.get(*document_id).await?;
            if document.tenant_id != appeal.tenant_id {
                return Err(AppError::Validation(
                    "supporting document does not belong to this institution".to_string(),
                ));
            }
            if !appeal.supporting_documents.contains(document_id) {
                appeal.supporting_documents.push(*document_id);
            }
        }

        let mut tenant = state.tenant_repo.get(appeal.tenant_id).await?;
        let now = Utc::now();
        let expected_version = tenant.version;
        tenant.updated_at = now;
        tenant.version += 1;

        let audit = AuditEntry::new(
            tenant.id,
            AuditAction::AppealInfoProvided,
            json!({
                "appeal_id": appeal.id,
                "additional_documents": additional_documents,
            }),
            "tenant",
            now,
        );

        let commit = TransitionCommit {
            tenant,
            expected_version,
            review: None,
            documents: Vec::new(),
            appeal: Some(appeal.clone()),
            audit,
        };

        match state.tenant_repo.commit_transition(commit).await {
            Ok(_) => break appeal,
            Err(StoreError::VersionConflict) if attempts == 0 => {
                attempts += 1;
                state.metrics.record_conflict_retry();
                debug!(appeal_id = %appeal_id, "appeal info conflicted, retrying");
                tokio::time::sleep(Duration::from_millis(state.config.retry_backoff_ms)).await;
            }
            Err(err) => return Err(err.into()),
        }
    };

    state.notifier.dispatch(NotificationEvent {
        tenant_id: appeal.tenant_id,
        kind: NotificationKind::AppealInfoProvided,
        payload: json!({ "appeal_id": appeal.id }),
    });

    Ok(appeal)
}
