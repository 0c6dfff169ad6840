use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use backend_application::commands::detection_commands;
use backend_application::queries::audit_queries;
use backend_application::AppState;
use backend_domain::{AnomalyAlert, AuditEntry, TenantId};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(_state): State<AppState>) -> StatusCode {
    StatusCode::OK
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> String {
    state.metrics.render_prometheus()
}

// Manual detection run; same code path as the nightly sweep, so it is
// just as idempotent for the day.
pub async fn run_detection(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AnomalyAlert>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let alerts = detection_commands::run_detection(&state, Utc::now()).await?;
    Ok(Json(alerts))
}

#[derive(Deserialize)]
pub struct AuditQuery {
    pub tenant_id: Uuid,
}

pub async fn audit_trail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entries = audit_queries::audit_trail(&state, TenantId(query.tenant_id)).await?;
    Ok(Json(entries))
}
