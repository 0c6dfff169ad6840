use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use backend_application::commands::detection_commands;
use backend_application::queries::{anomaly_queries, prediction_queries, risk_queries};
use backend_application::AppState;
use backend_domain::{
    AlertId,
    AnomalyAlert,
    ProcessingTimePrediction,
    RiskAssessment,
    TenantId,
};

use crate::error::HttpError;

pub async fn rejection_risk(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<RiskAssessment>, HttpError> {
    let assessment = risk_queries::assess_risk(&state, TenantId(tenant_id)).await?;
    Ok(Json(assessment))
}

pub async fn processing_time(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<ProcessingTimePrediction>, HttpError> {
    let prediction =
        prediction_queries::predict_processing_time(&state, TenantId(tenant_id)).await?;
    Ok(Json(prediction))
}

#[derive(Deserialize)]
pub struct AnomalyListQuery {
    pub acknowledged: Option<bool>,
}

pub async fn list_anomalies(
    State(state): State<AppState>,
    Query(query): Query<AnomalyListQuery>,
) -> Result<Json<Vec<AnomalyAlert>>, HttpError> {
    let alerts = anomaly_queries::list_alerts(&state, query.acknowledged).await?;
    Ok(Json(alerts))
}

pub async fn acknowledge_anomaly(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> Result<StatusCode, HttpError> {
    detection_commands::acknowledge_alert(&state, AlertId(alert_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
