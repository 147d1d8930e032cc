//! Unified error handling for NexaPro Core

use reqwest::StatusCode;
use thiserror::Error;

/// Library-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Access layer error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Field errors are kept verbatim so forms can render them.
    #[error("Validation error ({status}): {body}")]
    Validation {
        status: StatusCode,
        body: serde_json::Value,
    },

    #[error("API error ({status}): {body}")]
    Api {
        status: StatusCode,
        body: serde_json::Value,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build an error from a non-success backend response.
    pub fn from_response(status: StatusCode, body: serde_json::Value) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => {
                AppError::Unauthorized(detail_of(&body).unwrap_or_else(|| "Unauthorized".into()))
            }
            StatusCode::FORBIDDEN => {
                AppError::Forbidden(detail_of(&body).unwrap_or_else(|| "Access denied".into()))
            }
            StatusCode::NOT_FOUND => {
                AppError::NotFound(detail_of(&body).unwrap_or_else(|| "Not found".into()))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::Validation { status, body }
            }
            _ => AppError::Api { status, body },
        }
    }

    /// HTTP status carried by the error, if it came from a backend response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Http(e) => e.status(),
            AppError::Unauthorized(_) | AppError::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            AppError::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            AppError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            AppError::Validation { status, .. } | AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied `detail` message, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::Unauthorized(msg) | AppError::Forbidden(msg) | AppError::NotFound(msg) => {
                Some(msg.clone())
            }
            AppError::Validation { body, .. } | AppError::Api { body, .. } => detail_of(body),
            _ => None,
        }
    }
}

/// Extract the `detail` field the backend attaches to error bodies.
fn detail_of(body: &serde_json::Value) -> Option<String> {
    body.get("detail")
        .and_then(|d| d.as_str())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("Unit not found".to_string());
        assert_eq!(err.to_string(), "Not found: Unit not found");
    }

    #[test]
    fn test_error_conversion() {
        let err: AppError = anyhow::anyhow!("Something went wrong").into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_forbidden_uses_detail() {
        let err = AppError::from_response(
            StatusCode::FORBIDDEN,
            json!({"detail": "Property limit reached"}),
        );
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.detail().as_deref(), Some("Property limit reached"));
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_forbidden_without_detail_defaults() {
        let err = AppError::from_response(StatusCode::FORBIDDEN, json!({}));
        assert_eq!(err.detail().as_deref(), Some("Access denied"));
    }

    #[test]
    fn test_field_errors_kept_verbatim() {
        let body = json!({"name": ["This field is required."]});
        let err = AppError::from_response(StatusCode::BAD_REQUEST, body.clone());
        match err {
            AppError::Validation { status, body: b } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(b, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_statuses_are_api_errors() {
        let err = AppError::from_response(StatusCode::BAD_GATEWAY, json!(null));
        assert!(matches!(err, AppError::Api { .. }));
        assert!(err.detail().is_none());
    }
}
