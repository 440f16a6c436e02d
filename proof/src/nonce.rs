//! Nonce issuance for primary-chain accounts.

use ergauth_crypto::random_token;
use ergauth_store::ProofBackend;
use ergauth_types::{PendingUser, UserId};

use crate::{ProofContext, ProofError};

pub struct NonceIssuer<S> {
    ctx: ProofContext<S>,
}

impl<S: ProofBackend> NonceIssuer<S> {
    pub fn new(ctx: ProofContext<S>) -> Self {
        Self { ctx }
    }

    /// Mint a fresh nonce for the account keyed by `primary_address`,
    /// creating a pending account on first use.
    ///
    /// Every call bumps the account's nonce generation, which invalidates
    /// any proof created under the previous nonce.
    pub fn issue(&self, primary_address: &str) -> Result<PendingUser, ProofError> {
        let user_id =
            UserId::parse(primary_address).map_err(|e| ProofError::Validation(e.to_string()))?;
        let nonce = random_token(self.ctx.random.as_ref());
        let user = self.ctx.store.rotate_nonce(&user_id, &nonce, self.ctx.now())?;
        tracing::debug!(
            user = %user.id,
            generation = user.nonce_generation,
            "issued nonce"
        );
        Ok(user)
    }
}
