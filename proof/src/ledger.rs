//! Which addresses already prove ownership for an account.

use ergauth_store::ProofBackend;
use ergauth_types::VerificationId;

use crate::{ProofContext, ProofError};

pub struct UserProofLedger<S> {
    ctx: ProofContext<S>,
}

impl<S: ProofBackend> UserProofLedger<S> {
    pub fn new(ctx: ProofContext<S>) -> Self {
        Self { ctx }
    }

    /// Whether any account holds a VERIFIED proof for `address`.
    pub fn has_verified_proof(&self, address: &str) -> Result<bool, ProofError> {
        Ok(self.holder(address)?.is_some())
    }

    /// The record holding the verified proof for `address`.
    pub fn holder(&self, address: &str) -> Result<Option<VerificationId>, ProofError> {
        Ok(self.ctx.store.verified_holder(address)?)
    }
}
