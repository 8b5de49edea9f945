//! Application error types.
//!
//! Every error leaves as JSON `{"error": "<code>", "message": "<text>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_core::RelayError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    UpstreamTimeout(String),

    #[error("{0}")]
    NoReplyText(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Upstream(m) => (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error", m.as_str()),
            AppError::UpstreamTimeout(m) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "upstream_timeout", m.as_str())
            }
            AppError::NoReplyText(m) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "no_reply_text", m.as_str())
            }
        };
        if status.is_server_error() {
            error!(code, "{message}");
        } else {
            warn!(code, "{message}");
        }
        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Timeout(_) => AppError::UpstreamTimeout(e.to_string()),
            RelayError::NoText => AppError::NoReplyText(e.to_string()),
            RelayError::Upstream { .. } | RelayError::Request(_) | RelayError::Decode(_) => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn upstream_status_keeps_status_in_message() {
        let err = AppError::from(RelayError::Upstream {
            status: 401,
            body: "unauthorized".into(),
        });
        assert!(matches!(&err, AppError::Upstream(m) if m.contains("401")));
    }

    #[test]
    fn timeout_and_missing_text_are_distinct() {
        assert!(matches!(
            AppError::from(RelayError::Timeout(Duration::from_secs(1))),
            AppError::UpstreamTimeout(_)
        ));
        assert!(matches!(
            AppError::from(RelayError::NoText),
            AppError::NoReplyText(_)
        ));
    }

    #[test]
    fn status_codes() {
        let resp = AppError::Validation("Missing prompt".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = AppError::Upstream("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
