use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use catalog_core::DomainError;
use catalog_infra::CatalogError;

pub type RpcResult = Result<serde_json::Value, RpcError>;

/// Failure crossing the RPC boundary: a machine-readable status plus a message.
///
/// `missing` is only set for failed batch validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{status}: {message}")]
pub struct RpcError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<i32>>,
}

impl RpcError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            missing: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<CatalogError> for RpcError {
    fn from(err: CatalogError) -> Self {
        let status = err.status();
        match err {
            CatalogError::ValidationFailed { message, missing } => Self {
                status,
                message,
                missing: Some(missing.iter().map(|id| id.get()).collect()),
            },
            CatalogError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                Self {
                    status,
                    message: e.to_string(),
                    missing: None,
                }
            }
            other => Self {
                status,
                message: other.to_string(),
                missing: None,
            },
        }
    }
}

impl From<DomainError> for RpcError {
    fn from(err: DomainError) -> Self {
        let message = match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => msg,
        };
        Self::bad_request(message)
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self)).into_response()
    }
}
