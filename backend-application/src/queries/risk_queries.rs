use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::{AppError, AppState};
use backend_domain::services::risk;
use backend_domain::{AuditAction, AuditEntry, RiskAssessment, TenantId};

// Pure over a point-in-time snapshot; safe to call concurrently with
// state mutations, the result may just be momentarily stale.
pub async fn assess_risk(
    state: &AppState,
    tenant_id: TenantId,
) -> Result<RiskAssessment, AppError> {
    let tenant = state.tenant_repo.get(tenant_id).await?;
    let documents: Vec<_> = state
        .document_repo
        .list_for_tenant(tenant_id)
        .await?
        .into_iter()
        .filter(|d| !d.superseded)
        .collect();
    let peers = state
        .tenant_repo
        .peers_by_student_count(
            tenant.student_count.unwrap_or(0),
            risk::PEER_STUDENT_RADIUS,
            tenant.id,
        )
        .await?;

    let now = Utc::now();
    let assessment = risk::assess(&tenant, &documents, &peers, now);

    // Scoring runs land in the audit log too, but as a best-effort append:
    // a read path never fails because bookkeeping did.
    let audit = AuditEntry::new(
        tenant.id,
        AuditAction::RiskAssessed,
        json!({
            "risk_score": assessment.risk_score,
            "risk_level": assessment.risk_level.as_str(),
        }),
        "system",
        now,
    );
    if let Err(err) = state.audit_repo.append(audit).await {
        warn!(tenant_id = %tenant_id, "failed to record scoring run: {}", err);
    }

    state.metrics.record_risk_assessment();
    Ok(assessment)
}
