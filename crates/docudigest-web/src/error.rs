use std::any::Any;
use std::path::PathBuf;

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docudigest_core::SummarizeError;
use docudigest_ingest::IngestError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Every way a request can fail.
///
/// `Display` is the `error` string sent to the client. Causes stay on the
/// server side and are only logged.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("File upload error")]
    Upload(String),
    #[error("File too large")]
    TooLarge,
    #[error("No file uploaded.")]
    NoFile,
    #[error("Uploaded file not found on server: {}", .0.display())]
    FileNotSaved(PathBuf),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    #[error("Server error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NoFile => StatusCode::BAD_REQUEST,
            ApiError::Ingest(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Summarize(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Upload(_)
            | ApiError::FileNotSaved(_)
            | ApiError::Ingest(_)
            | ApiError::Summarize(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `error` string sent to the client.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Server-side detail for the log line, beyond the client message.
    fn detail(&self) -> Option<String> {
        match self {
            ApiError::Upload(detail) | ApiError::Internal(detail) => Some(detail.clone()),
            ApiError::Ingest(e) => std::error::Error::source(e).map(|s| s.to_string()),
            ApiError::Summarize(SummarizeError::Upstream { detail, .. }) => Some(detail.clone()),
            _ => None,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge
        } else {
            ApiError::Upload(e.body_text())
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge
        } else {
            ApiError::Upload(e.body_text())
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("extraction task failed: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();
        let detail = self.detail();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), detail = ?detail, "{}", message);
        } else {
            tracing::info!(status = status.as_u16(), detail = ?detail, "{}", message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Response for a panic anywhere below the router.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
