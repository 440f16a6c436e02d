//! Proof record storage trait.

use crate::StoreError;
use ergauth_types::{ErgoProof, ProofStatus, Timestamp, VerificationId};

/// Result of the INITIATED → PENDING compare-and-set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// The row was INITIATED and is now PENDING with the address bound.
    Bound(ErgoProof),
    /// No INITIATED row matched: unknown id, or already bound.
    NoMatch,
    /// Another record already holds a verified proof for the address.
    AddressTaken { holder: VerificationId },
}

/// Result of the PENDING → VERIFIED transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    Finalized(ErgoProof),
    /// The row was already VERIFIED; nothing was written.
    AlreadyVerified(ErgoProof),
    /// The row exists but is not in a state that can be finalized.
    NotPending(ProofStatus),
    Missing,
}

pub trait ProofStore {
    /// Insert a new record. Fails with [`StoreError::Duplicate`] if the id
    /// is already taken.
    fn insert_proof(&self, proof: &ErgoProof) -> Result<(), StoreError>;

    fn get_proof(&self, id: &VerificationId) -> Result<Option<ErgoProof>, StoreError>;

    /// Atomically bind `address` to an INITIATED record and move it to
    /// PENDING. Never touches a record in any other state.
    fn bind_address(
        &self,
        id: &VerificationId,
        address: &str,
        now: Timestamp,
    ) -> Result<BindOutcome, StoreError>;

    /// Atomically move a PENDING record to VERIFIED and claim its address in
    /// the verified-address index.
    ///
    /// Fails with [`StoreError::Duplicate`] if a different record already
    /// holds the address.
    fn finalize_proof(
        &self,
        id: &VerificationId,
        signed_message: &str,
        proof: &str,
        now: Timestamp,
    ) -> Result<FinalizeOutcome, StoreError>;

    /// The record holding the verified proof for `address`, if any.
    fn verified_holder(&self, address: &str) -> Result<Option<VerificationId>, StoreError>;

    /// Delete every non-VERIFIED record whose last update is at least
    /// `ttl_secs` before `now`. Returns the number deleted.
    fn sweep_expired(&self, ttl_secs: u64, now: Timestamp) -> Result<usize, StoreError>;

    fn proof_count(&self) -> Result<u64, StoreError>;
}
