use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use backend_application::commands::appeal_commands;
use backend_application::AppState;
use backend_domain::{Appeal, AppealDecision, AppealId, DocumentId, TenantId};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Deserialize)]
pub struct OpenAppealPayload {
    pub tenant_id: Uuid,
    pub reason: String,
    #[serde(default)]
    pub supporting_document_ids: Vec<Uuid>,
}

pub async fn open_appeal(
    State(state): State<AppState>,
    Json(payload): Json<OpenAppealPayload>,
) -> Result<Json<Appeal>, HttpError> {
    let appeal = appeal_commands::open_appeal(
        &state,
        TenantId(payload.tenant_id),
        payload.reason,
        payload
            .supporting_document_ids
            .into_iter()
            .map(DocumentId)
            .collect(),
    )
    .await?;
    Ok(Json(appeal))
}

#[derive(Deserialize)]
pub struct DecideAppealPayload {
    pub decision: AppealDecision,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reviewed_by: Option<String>,
}

pub async fn decide_appeal(
    State(state): State<AppState>,
    Path(appeal_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<DecideAppealPayload>,
) -> Result<Json<Appeal>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let appeal = appeal_commands::decide_appeal(
        &state,
        AppealId(appeal_id),
        payload.decision,
        payload.notes,
        payload.reviewed_by.unwrap_or_else(|| "admin".to_string()),
    )
    .await?;
    Ok(Json(appeal))
}

#[derive(Deserialize)]
pub struct AppealInfoPayload {
    #[serde(default)]
    pub additional_document_ids: Vec<Uuid>,
}

pub async fn provide_appeal_info(
    State(state): State<AppState>,
    Path(appeal_id): Path<Uuid>,
    Json(payload): Json<AppealInfoPayload>,
) -> Result<Json<Appeal>, HttpError> {
    let appeal = appeal_commands::provide_appeal_info(
        &state,
        AppealId(appeal_id),
        payload
            .additional_document_ids
            .into_iter()
            .map(DocumentId)
            .collect(),
    )
    .await?;
    Ok(Json(appeal))
}
