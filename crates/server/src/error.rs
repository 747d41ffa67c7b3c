//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Client errors map to 400 with
//! a specific message; server errors are logged, captured to Sentry, and
//! answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ClassificationError;

/// Message returned to clients for any server-side failure.
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Missing or unreadable request input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No image file in the upload.
    #[error("missing file")]
    MissingFile,

    /// No `userId` in the request.
    #[error("missing userId")]
    MissingUserId,

    /// The multipart body could not be read.
    #[error("invalid multipart body: {0}")]
    InvalidMultipart(String),

    /// The upload exceeded the configured body limit.
    #[error("payload too large")]
    PayloadTooLarge,
}

impl ValidationError {
    /// Message shown to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::MissingFile => "Please upload an image file.".to_string(),
            Self::MissingUserId => "Please provide a userId.".to_string(),
            Self::InvalidMultipart(_) => "Invalid multipart form data.".to_string(),
            Self::PayloadTooLarge => "Image exceeds the upload size limit.".to_string(),
        }
    }
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client sent incomplete input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Image classification failed.
    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(ValidationError::PayloadTooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Classification(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Validation(err) => {
                tracing::debug!(error = %err, "Rejected request");
                err.client_message()
            }
            Self::Classification(_) | Self::Database(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                GENERIC_SERVER_ERROR.to_string()
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(ValidationError::MissingFile);
        assert_eq!(err.to_string(), "Validation error: missing file");

        let err = AppError::from(ValidationError::MissingUserId);
        assert_eq!(err.to_string(), "Validation error: missing userId");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(ValidationError::MissingFile.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ValidationError::InvalidMultipart("eof".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ValidationError::PayloadTooLarge.into()),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(
                ClassificationError::Api {
                    status: 403,
                    message: "key invalid".to_string()
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(RepositoryError::DataCorruption("bad row".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_server_error_body_is_generic() {
        let err = AppError::from(ClassificationError::Malformed("secret detail".to_string()));
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = String::from_utf8_lossy(&bytes);

        assert!(body.contains(GENERIC_SERVER_ERROR));
        assert!(body.contains("\"success\":false"));
        assert!(!body.contains("secret detail"));
    }
}
