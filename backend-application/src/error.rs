use thiserror::Error;

use backend_domain::{RuleViolation, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    // Bad input shape, size or type; always client-correctable.
    #[error("{0}")]
    Validation(String),
    // Valid input, but the current state forbids the operation.
    #[error("{0}")]
    Precondition(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    // Optimistic-lock retry exhausted; safe to retry the whole operation.
    #[error("the operation conflicted with a concurrent update, please retry")]
    Conflict,
    // Document-storage collaborator failure; nothing was recorded.
    #[error("document storage failed: {0}")]
    Storage(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RuleViolation> for AppError {
    fn from(value: RuleViolation) -> Self {
        match value {
            RuleViolation::Validation(msg) => AppError::Validation(msg),
            RuleViolation::Precondition(msg) => AppError::Precondition(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(entity) => AppError::NotFound(entity),
            StoreError::VersionConflict => AppError::Conflict,
            StoreError::Internal(err) => AppError::Internal(err),
        }
    }
}
