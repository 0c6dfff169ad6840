use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    BadGateway(String),
    Internal(String),
}

impl From<backend_application::AppError> for HttpError {
    fn from(value: backend_application::AppError) -> Self {
        match value {
            backend_application::AppError::Validation(msg) => HttpError::BadRequest(msg),
            backend_application::AppError::Precondition(msg) => HttpError::Conflict(msg),
            backend_application::AppError::NotFound(entity) => {
                HttpError::NotFound(format!("{} not found", entity))
            }
            backend_application::AppError::Conflict => HttpError::Conflict(
                "the operation conflicted with a concurrent update, please retry".to_string(),
            ),
            backend_application::AppError::Storage(_) => {
                // Storage details stay in the logs; the caller just retries.
                HttpError::BadGateway("document storage is unavailable, try again".to_string())
            }
            backend_application::AppError::Unauthorized => HttpError::Unauthorized,
            backend_application::AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_application::AppError;

    #[test]
    fn taxonomy_maps_to_the_documented_status_codes() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::Precondition("no".into()), StatusCode::CONFLICT),
            (AppError::NotFound("tenant"), StatusCode::NOT_FOUND),
            (AppError::Conflict, StatusCode::CONFLICT),
            (AppError::Storage("boom".into()), StatusCode::BAD_GATEWAY),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];
        for (err, expected) in cases {
            let response = HttpError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
