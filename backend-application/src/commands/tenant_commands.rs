use chrono::Utc;
use serde_json::json;

use crate::{AppError, AppState};
use backend_domain::{AuditAction, AuditEntry, Tenant};

pub async fn register_tenant(
    state: &AppState,
    name: String,
    student_count: Option<u32>,
) -> Result<Tenant, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation(
            "institution name must not be empty".to_string(),
        ));
    }

    let now = Utc::now();
    let tenant = Tenant::register(name, student_count, now);
    let audit = AuditEntry::new(
        tenant.id,
        AuditAction::TenantRegistered,
        json!({
            "name": tenant.name,
            "student_count": tenant.student_count,
        }),
        "system",
        now,
    );

    state.tenant_repo.create(tenant.clone(), audit).await?;
    Ok(tenant)
}
