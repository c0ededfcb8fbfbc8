//! Mapping from [`ConvertError`] to HTTP responses.

use crate::error::ConvertError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error body: `{"detail": "...", "suggestion": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A [`ConvertError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub ConvertError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ConvertError::UnsupportedFileType { .. }
            | ConvertError::MissingFile
            | ConvertError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ConvertError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ConvertError::ConverterUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ConvertError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ConvertError::ConversionFailed(_)
            | ConvertError::InvalidConfig(_)
            | ConvertError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translate a multipart read failure, keeping the size-limit case apart.
    pub fn from_multipart(err: MultipartError, limit_bytes: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self(ConvertError::PayloadTooLarge { limit_bytes })
        } else {
            Self(ConvertError::InvalidUpload(err.body_text()))
        }
    }
}

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ConvertError::Internal(ref detail) = self.0 {
            tracing::error!(detail = %detail, "Internal error");
        } else {
            tracing::debug!(
                status = status.as_u16(),
                client_error = self.0.is_client_error(),
                detail = %self.0,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            detail: self.0.to_string(),
            suggestion: self.0.suggestion().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}
