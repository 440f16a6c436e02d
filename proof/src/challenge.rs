//! Signing challenges handed to the mobile wallet.
//!
//! The challenge tells the wallet what to sign (the account's current
//! nonce), which key must sign it (the sigma predicate of the address the
//! wallet chose) and where to post the result.

use serde::{Deserialize, Serialize};

use ergauth_crypto::{sigma_boolean_base64, CryptoError, ErgoAddress};
use ergauth_store::ProofBackend;
use ergauth_types::{UserId, VerificationId};

use crate::cleanup::discard_pending_user;
use crate::{ProofContext, ProofError};

/// Shown by the wallet next to the signing request.
pub const SIGNING_PROMPT: &str = "Sign the message to prove you own this address";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageSeverity {
    Information,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub address: String,
    pub signing_message: String,
    /// Base64 sigma predicate the signature must satisfy.
    pub sigma_boolean: String,
    pub user_message: String,
    pub severity: MessageSeverity,
    pub reply_to: String,
}

/// Derive the base64 sigma predicate for `address`.
///
/// Pure function of the address: equal inputs give byte-identical output.
pub fn derive_sigma_boolean(address: &str) -> Result<String, CryptoError> {
    let tree = ErgoAddress::parse(address)?.script_tree_bytes()?;
    sigma_boolean_base64(&tree)
}

pub struct ChallengeBuilder<S> {
    ctx: ProofContext<S>,
}

impl<S: ProofBackend> ChallengeBuilder<S> {
    pub fn new(ctx: ProofContext<S>) -> Self {
        Self { ctx }
    }

    /// Build the challenge for `verification_id`, signed by `address`.
    ///
    /// Read-only with respect to the proof record. On every failure after
    /// the owner is known, the owner is discarded if still pending.
    pub fn build(
        &self,
        verification_id: &str,
        address: Option<&str>,
    ) -> Result<Challenge, ProofError> {
        let id = VerificationId::parse(verification_id)
            .map_err(|e| ProofError::Unprocessable(e.to_string()))?;
        let proof = self
            .ctx
            .store
            .get_proof(&id)?
            .ok_or_else(|| ProofError::Unprocessable(format!("no proof for {id}")))?;
        let owner = proof.user_id;

        let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) else {
            return Err(self.fail(&owner, ProofError::Unprocessable("address is required".into())));
        };

        let user = match self.ctx.store.get_user(&owner) {
            Ok(user) => user,
            Err(e) => return Err(self.fail(&owner, e.into())),
        };
        let Some(user) = user else {
            return Err(self.fail(&owner, ProofError::Unprocessable(format!("no user {owner}"))));
        };
        let Some(nonce) = user.nonce else {
            return Err(self.fail(
                &owner,
                ProofError::Unprocessable(format!("user {owner} has no nonce")),
            ));
        };
        if user.nonce_generation != proof.nonce_generation {
            // The account has moved on to a newer flow; leave it alone.
            return Err(ProofError::Unprocessable(format!(
                "nonce for {id} was superseded"
            )));
        }

        let sigma_boolean = match derive_sigma_boolean(address) {
            Ok(sigma) => sigma,
            Err(e) => {
                return Err(self.fail(
                    &owner,
                    ProofError::Internal(format!("sigma predicate for {address}: {e}")),
                ))
            }
        };

        tracing::debug!(verification_id = %id, %address, "built challenge");
        Ok(Challenge {
            address: address.to_string(),
            signing_message: nonce,
            sigma_boolean,
            user_message: SIGNING_PROMPT.to_string(),
            severity: MessageSeverity::Information,
            reply_to: self.ctx.settings.reply_to(id.as_str()),
        })
    }

    fn fail(&self, owner: &UserId, error: ProofError) -> ProofError {
        tracing::debug!(user = %owner, "challenge failed: {error}");
        discard_pending_user(self.ctx.store.as_ref(), owner);
        error
    }
}
