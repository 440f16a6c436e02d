//! Reclaims abandoned proof records.

use ergauth_store::ProofBackend;

use crate::{ProofContext, ProofError};

pub struct ExpiryReaper<S> {
    ctx: ProofContext<S>,
}

impl<S: ProofBackend> ExpiryReaper<S> {
    pub fn new(ctx: ProofContext<S>) -> Self {
        Self { ctx }
    }

    /// Delete every non-VERIFIED record not updated within the TTL.
    pub fn sweep(&self) -> Result<usize, ProofError> {
        let ttl = self.ctx.settings.proof_ttl_secs;
        let removed = self.ctx.store.sweep_expired(ttl, self.ctx.now())?;
        if removed > 0 {
            tracing::info!(removed, ttl_secs = ttl, "reaped expired proofs");
        } else {
            tracing::debug!("no expired proofs");
        }
        Ok(removed)
    }
}
