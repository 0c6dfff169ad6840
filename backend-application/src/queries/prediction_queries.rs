use chrono::{Duration, Utc};

use crate::{AppError, AppState};
use backend_domain::services::prediction;
use backend_domain::{ProcessingTimePrediction, TenantId};

pub async fn predict_processing_time(
    state: &AppState,
    tenant_id: TenantId,
) -> Result<ProcessingTimePrediction, AppError> {
    let tenant = state.tenant_repo.get(tenant_id).await?;
    let documents: Vec<_> = state
        .document_repo
        .list_for_tenant(tenant.id)
        .await?
        .into_iter()
        .filter(|d| !d.superseded)
        .collect();

    let now = Utc::now();
    let approved = state
        .tenant_repo
        .approved_between(now - Duration::days(30), now)
        .await?;
    let base_days = prediction::average_processing_days(&approved);

    state.metrics.record_prediction();
    Ok(prediction::predict(base_days, &documents))
}
