use axum::extract::{Multipart, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use backend_application::commands::{document_commands, review_commands, tenant_commands};
use backend_application::queries::status_queries;
use backend_application::queries::status_queries::VerificationStatusView;
use backend_application::AppState;
use backend_domain::{
    DocumentType,
    ReviewAction,
    Tenant,
    TenantId,
    VerificationDocument,
};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Deserialize)]
pub struct RegisterTenantPayload {
    pub name: String,
    #[serde(default)]
    pub student_count: Option<u32>,
}

pub async fn register_tenant(
    State(state): State<AppState>,
    Json(payload): Json<RegisterTenantPayload>,
) -> Result<Json<Tenant>, HttpError> {
    let tenant =
        tenant_commands::register_tenant(&state, payload.name, payload.student_count).await?;
    Ok(Json(tenant))
}

// Multipart upload: tenant_id and document_type as text fields plus one
// file field. The 10 MiB document limit is enforced by the command; the
// transport body limit above it only guards against unbounded bodies.
pub async fn submit_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VerificationDocument>, HttpError> {
    let mut tenant_id: Option<TenantId> = None;
    let mut document_type: Option<DocumentType> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| HttpError::BadRequest(err.to_string()))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("tenant_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| HttpError::BadRequest(err.to_string()))?;
                let id = text
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| HttpError::BadRequest("invalid tenant_id".to_string()))?;
                tenant_id = Some(TenantId(id));
            }
            Some("document_type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| HttpError::BadRequest(err.to_string()))?;
                document_type = Some(parse_document_type(&text)?);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| HttpError::BadRequest(err.to_string()))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let tenant_id =
        tenant_id.ok_or_else(|| HttpError::BadRequest("tenant_id is required".to_string()))?;
    let document_type = document_type
        .ok_or_else(|| HttpError::BadRequest("document_type is required".to_string()))?;
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| HttpError::BadRequest("file is required".to_string()))?;

    let document = document_commands::submit_document(
        &state,
        document_commands::SubmitDocumentRequest {
            tenant_id,
            document_type,
            file_name,
            content_type,
            bytes,
        },
    )
    .await?;

    Ok(Json(document))
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub tenant_id: Uuid,
}

pub async fn verification_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<VerificationStatusView>, HttpError> {
    let view = status_queries::verification_status(&state, TenantId(query.tenant_id)).await?;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct ReviewPayload {
    pub tenant_id: Uuid,
    pub action: ReviewAction,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub requested_types: Vec<DocumentType>,
}

pub async fn record_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReviewPayload>,
) -> Result<Json<Tenant>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let tenant = review_commands::record_review(
        &state,
        TenantId(payload.tenant_id),
        review_commands::ReviewRequest {
            action: payload.action,
            reviewer: payload.reviewer.unwrap_or_else(|| "admin".to_string()),
            notes: payload.notes,
            requested_types: payload.requested_types,
        },
    )
    .await?;
    Ok(Json(tenant))
}

fn parse_document_type(raw: &str) -> Result<DocumentType, HttpError> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_uppercase()))
        .map_err(|_| HttpError::BadRequest(format!("unknown document_type '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_types_parse_case_insensitively() {
        assert_eq!(
            parse_document_type("enrollment_data").expect("parse"),
            DocumentType::EnrollmentData
        );
        assert_eq!(
            parse_document_type("ACCREDITATION").expect("parse"),
            DocumentType::Accreditation
        );
        assert!(parse_document_type("diploma").is_err());
    }
}
