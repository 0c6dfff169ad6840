use crate::{AppError, AppState};
use backend_domain::AnomalyAlert;

pub async fn list_alerts(
    state: &AppState,
    acknowledged: Option<bool>,
) -> Result<Vec<AnomalyAlert>, AppError> {
    let alerts = state.alert_repo.list(acknowledged).await?;
    Ok(alerts)
}
