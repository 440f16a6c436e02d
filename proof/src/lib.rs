//! Cross-device Ergo wallet ownership proofs.
//!
//! A desktop session initiates a proof record and shows its id as a QR
//! code. The mobile wallet pulls a challenge for that id, binds the address
//! it will sign with, signs the account's nonce and posts the signature
//! back. The desktop observes the record reaching VERIFIED.
//!
//! Neither side holds a connection to the other: all state lives in the
//! store, addressed by the unguessable verification id.
//!
//! Flow:
//! 1. [`NonceIssuer`] mints a nonce for the account.
//! 2. [`ProofInitiator`] creates the INITIATED record.
//! 3. [`ChallengeBuilder`] hands the wallet what to sign.
//! 4. [`AddressBinder`] claims the address (INITIATED → PENDING).
//! 5. [`SignatureVerifier`] checks the signature (PENDING → VERIFIED).
//!
//! [`ExpiryReaper`] reclaims abandoned records on a timer.

pub mod binder;
pub mod challenge;
pub mod cleanup;
pub mod context;
pub mod engine;
pub mod error;
pub mod initiate;
pub mod ledger;
pub mod nonce;
pub mod reaper;
pub mod settings;
pub mod verifier;

pub use binder::{AddressBinder, BindResult};
pub use challenge::{derive_sigma_boolean, Challenge, ChallengeBuilder, MessageSeverity};
pub use cleanup::discard_pending_user;
pub use context::ProofContext;
pub use engine::ProofEngine;
pub use error::ProofError;
pub use initiate::ProofInitiator;
pub use ledger::UserProofLedger;
pub use nonce::NonceIssuer;
pub use reaper::ExpiryReaper;
pub use settings::{ProofSettings, DEFAULT_PROOF_TTL_SECS, VERIFY_PATH};
pub use verifier::{Rejection, SignatureVerifier, VerifyOutcome};
