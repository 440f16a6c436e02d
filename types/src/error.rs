//! Top-level error type shared across crates.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown proof status: {0}")]
    UnknownStatus(String),

    #[error("verification id is empty")]
    EmptyVerificationId,

    #[error("user id is empty")]
    EmptyUserId,
}
