//! Creation of INITIATED proof records by the desktop session.

use ergauth_crypto::random_token;
use ergauth_store::{ProofBackend, StoreError};
use ergauth_types::{ErgoProof, UserId, VerificationId};

use crate::{ProofContext, ProofError};

/// Fresh ids are 256-bit random; a collision means a broken random source.
const MAX_ID_ATTEMPTS: usize = 3;

pub struct ProofInitiator<S> {
    ctx: ProofContext<S>,
}

impl<S: ProofBackend> ProofInitiator<S> {
    pub fn new(ctx: ProofContext<S>) -> Self {
        Self { ctx }
    }

    /// Start a proof flow for `user_id`.
    ///
    /// The record is stamped with the account's current nonce generation.
    pub fn initiate(&self, user_id: &str) -> Result<ErgoProof, ProofError> {
        let user_id = UserId::parse(user_id).map_err(|e| ProofError::Validation(e.to_string()))?;
        let user = self
            .ctx
            .store
            .get_user(&user_id)?
            .ok_or_else(|| ProofError::NotFound(format!("user {user_id}")))?;

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = VerificationId::new(random_token(self.ctx.random.as_ref()));
            let proof =
                ErgoProof::initiated(id, user.id.clone(), user.nonce_generation, self.ctx.now());
            match self.ctx.store.insert_proof(&proof) {
                Ok(()) => {
                    tracing::info!(
                        verification_id = %proof.verification_id,
                        user = %proof.user_id,
                        "initiated proof"
                    );
                    return Ok(proof);
                }
                Err(StoreError::Duplicate(_)) => {
                    tracing::warn!("verification id collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ProofError::Internal(
            "could not mint a unique verification id".into(),
        ))
    }
}
