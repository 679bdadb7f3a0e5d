//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies.
//!
//! Error mappings:
//! - `RepoNotFound` → 404
//! - `InvalidPath`, `InvalidRepository`, `EmptyUpload`, `Upload` → 400
//! - `Git`, `Io` → 500
//!
//! Parse and layout problems never show up here; they are recovered per
//! record inside `graph`.

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

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not a valid git repository")]
    InvalidRepository,

    #[error("No .git files found in the upload")]
    EmptyUpload,

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RepoNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidPath(_)
            | AppError::InvalidRepository
            | AppError::EmptyUpload
            | AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::Git(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::RepoNotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidPath("../x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidRepository.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::EmptyUpload.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Git(git2::Error::from_str("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = AppError::RepoNotFound("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Repository not found: abc" }));
    }
}
