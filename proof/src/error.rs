use thiserror::Error;

use ergauth_store::StoreError;

#[derive(Debug, Error)]
pub enum ProofError {
    /// Missing or malformed caller input.
    #[error("invalid request: {0}")]
    Validation(String),

    /// No matching record, or a conditional update matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was well-formed but the record cannot serve it.
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// The address is already attached to an account.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage or crypto failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ProofError {
    fn from(e: StoreError) -> Self {
        ProofError::Internal(e.to_string())
    }
}
