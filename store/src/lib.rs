//! Abstract storage traits for wallet ownership proofs.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! All protocol state lives behind them: there is no in-process session.
//! Operations that change a record's status are conditional updates that a
//! backend must apply atomically.

pub mod error;
pub mod proof;
pub mod user;

pub use error::StoreError;
pub use proof::{BindOutcome, FinalizeOutcome, ProofStore};
pub use user::UserStore;

/// Everything the proof services need from a backend.
pub trait ProofBackend: UserStore + ProofStore + Send + Sync {}

impl<T: UserStore + ProofStore + Send + Sync> ProofBackend for T {}
