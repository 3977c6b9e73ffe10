use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::validation::ValidationErrors;

/// Contact service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("invalid request body")]
    InvalidBody,
    #[error("invalid query parameters")]
    InvalidQuery,
    #[error("invalid submission id")]
    InvalidId,
    #[error("invalid status; expected one of new, read, replied, archived")]
    InvalidStatus,
    #[error("submission not found")]
    SubmissionNotFound,
    #[error("database not connected")]
    StorageUnavailable,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ContactServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::InvalidBody => "INVALID_BODY",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::SubmissionNotFound => "SUBMISSION_NOT_FOUND",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ContactServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_)
            | Self::InvalidBody
            | Self::InvalidQuery
            | Self::InvalidId
            | Self::InvalidStatus => StatusCode::BAD_REQUEST,
            Self::SubmissionNotFound => StatusCode::NOT_FOUND,
            Self::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(ref errors) = self {
            body["errors"] = serde_json::json!(errors.errors());
        }
        (status, axum::Json(body)).into_response()
    }
}
