use crate::{AppError, AppState};
use backend_domain::{AuditEntry, TenantId};

// Chronological scan consumed by the report compiler.
pub async fn audit_trail(
    state: &AppState,
    tenant_id: TenantId,
) -> Result<Vec<AuditEntry>, AppError> {
    let entries = state.audit_repo.scan_for_tenant(tenant_id).await?;
    Ok(entries)
}
