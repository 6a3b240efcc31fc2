//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` for all error conditions and implements Axum's
//! `IntoResponse` to convert errors to HTTP responses with JSON bodies.
//!
//! Error mappings:
//! - `RefNotFound`, `CommitNotFound` → 404
//! - `InvalidRequest` → 400
//! - `PreconditionFailed` → 409
//! - `Git`, `Internal` → 500

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Ref not found: {0}")]
    RefNotFound(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Git(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.message().to_string()),
            AppError::RepoNotFound(path) => (
                StatusCode::NOT_FOUND,
                format!("Repository not found: {}", path),
            ),
            AppError::RefNotFound(name) => {
                (StatusCode::NOT_FOUND, format!("Ref not found: {}", name))
            }
            AppError::CommitNotFound(oid) => {
                (StatusCode::NOT_FOUND, format!("Commit not found: {}", oid))
            }
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid request: {}", msg))
            }
            AppError::PreconditionFailed(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
