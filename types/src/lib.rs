//! Fundamental types for Ergo wallet ownership proofs.
//!
//! This crate defines the records shared across every other crate in the
//! workspace: pending accounts, proof records and their status machine,
//! capability tokens, and timestamps.

pub mod error;
pub mod proof;
pub mod time;
pub mod user;

pub use error::TypesError;
pub use proof::{ErgoProof, ProofStatus, VerificationId};
pub use time::{Clock, SystemClock, Timestamp};
pub use user::{PendingUser, UserId, UserStatus};
