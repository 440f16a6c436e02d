//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use ergauth_proof::ProofError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    Validation(String),

    /// A signature that does not authenticate against the bound address.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("server error: {0}")]
    Server(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::Validation(_) => StatusCode::BAD_REQUEST,
            RpcError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RpcError::Conflict(_) => StatusCode::CONFLICT,
            RpcError::Internal(_) | RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            RpcError::Conflict(message) => ErrorBody {
                error: "conflict".into(),
                message: Some(message.clone()),
            },
            // Storage and crypto details stay in the log.
            RpcError::Internal(_) | RpcError::Server(_) => ErrorBody {
                error: "internal server error".into(),
                message: None,
            },
            RpcError::Validation(detail)
            | RpcError::Unauthorized(detail)
            | RpcError::NotFound(detail)
            | RpcError::Unprocessable(detail) => ErrorBody {
                error: detail.clone(),
                message: None,
            },
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!("{self}");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<ProofError> for RpcError {
    fn from(e: ProofError) -> Self {
        match e {
            ProofError::Validation(m) => RpcError::Validation(m),
            ProofError::NotFound(m) => RpcError::NotFound(m),
            ProofError::Unprocessable(m) => RpcError::Unprocessable(m),
            ProofError::Conflict(m) => RpcError::Conflict(m),
            ProofError::Internal(m) => RpcError::Internal(m),
        }
    }
}
