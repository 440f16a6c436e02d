//! Checking the wallet's signature and finalizing the proof.

use ergauth_crypto::{decode_proof_base64, verify_signature, ErgoAddress};
use ergauth_store::{FinalizeOutcome, ProofBackend, StoreError};
use ergauth_types::{ErgoProof, VerificationId};

use crate::ledger::UserProofLedger;
use crate::ProofContext;

/// Finalize attempts before giving up on a verified-address index that
/// keeps changing underneath us.
const FINALIZE_ATTEMPTS: usize = 3;

/// Why a signature submission was turned away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    MissingInput(&'static str),
    UnknownProof,
    /// No address has been bound to the record yet.
    AddressNotBound,
    /// The proof blob could not be decoded.
    MalformedProof(String),
    /// The account's nonce was reissued after this record was created.
    StaleNonce,
    BadSignature,
    /// Another account already verified this address.
    AddressTaken,
}

impl Rejection {
    /// Whether the submission was well-formed but failed authentication.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Rejection::StaleNonce | Rejection::BadSignature)
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MissingInput(field) => write!(f, "{field} is required"),
            Rejection::UnknownProof => f.write_str("unknown verification id"),
            Rejection::AddressNotBound => f.write_str("no address is bound to this proof"),
            Rejection::MalformedProof(reason) => write!(f, "malformed proof: {reason}"),
            Rejection::StaleNonce => f.write_str("signing nonce has been superseded"),
            Rejection::BadSignature => f.write_str("signature does not match the bound address"),
            Rejection::AddressTaken => f.write_str("address is already attached to an account"),
        }
    }
}

/// Result of one verify call. Every path ends in exactly one variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified(ErgoProof),
    Rejected(Rejection),
    Error(String),
}

pub struct SignatureVerifier<S> {
    ctx: ProofContext<S>,
    ledger: UserProofLedger<S>,
}

impl<S: ProofBackend> SignatureVerifier<S> {
    pub fn new(ctx: ProofContext<S>) -> Self {
        Self {
            ledger: UserProofLedger::new(ctx.clone()),
            ctx,
        }
    }

    /// Verify `proof` over the owner's current nonce with the key of the
    /// bound address, and on success move the record to VERIFIED.
    ///
    /// Safe to retry: a record that is already VERIFIED comes back as
    /// [`VerifyOutcome::Verified`] unchanged.
    pub fn verify(
        &self,
        verification_id: Option<&str>,
        signed_message: Option<&str>,
        proof: Option<&str>,
    ) -> VerifyOutcome {
        let outcome = self.run(verification_id, signed_message, proof);
        match &outcome {
            VerifyOutcome::Verified(p) => {
                tracing::info!(verification_id = %p.verification_id, "proof verified")
            }
            VerifyOutcome::Rejected(r) => {
                tracing::warn!(verification_id = verification_id.unwrap_or(""), "verify rejected: {r}")
            }
            VerifyOutcome::Error(e) => {
                tracing::error!(verification_id = verification_id.unwrap_or(""), "verify failed: {e}")
            }
        }
        outcome
    }

    fn run(
        &self,
        verification_id: Option<&str>,
        signed_message: Option<&str>,
        proof: Option<&str>,
    ) -> VerifyOutcome {
        let (Some(raw_id), Some(signed_message), Some(proof_blob)) = (
            present(verification_id),
            present(signed_message),
            present(proof),
        ) else {
            let field = if present(verification_id).is_none() {
                "verificationId"
            } else if present(signed_message).is_none() {
                "signedMessage"
            } else {
                "proof"
            };
            return VerifyOutcome::Rejected(Rejection::MissingInput(field));
        };
        let id = VerificationId::new(raw_id);

        let record = match self.ctx.store.get_proof(&id) {
            Ok(Some(record)) => record,
            Ok(None) => return VerifyOutcome::Rejected(Rejection::UnknownProof),
            Err(e) => return VerifyOutcome::Error(e.to_string()),
        };
        let Some(bound) = record.default_address.clone() else {
            return VerifyOutcome::Rejected(Rejection::AddressNotBound);
        };

        let user = match self.ctx.store.get_user(&record.user_id) {
            Ok(user) => user,
            Err(e) => return VerifyOutcome::Error(e.to_string()),
        };
        let nonce = match user {
            Some(user) if user.nonce_generation == record.nonce_generation => user.nonce,
            _ => None,
        };
        let Some(nonce) = nonce else {
            return VerifyOutcome::Rejected(Rejection::StaleNonce);
        };

        let address = match ErgoAddress::parse(&bound) {
            Ok(address) => address,
            Err(e) => return VerifyOutcome::Error(format!("stored address {bound}: {e}")),
        };
        let Some(statement) = address.prove_dlog() else {
            return VerifyOutcome::Error(format!("stored address {bound} is not P2PK"));
        };
        let proof_bytes = match decode_proof_base64(proof_blob) {
            Ok(bytes) => bytes,
            Err(e) => return VerifyOutcome::Rejected(Rejection::MalformedProof(e.to_string())),
        };
        match verify_signature(statement, nonce.as_bytes(), &proof_bytes) {
            Ok(true) => {}
            Ok(false) => return VerifyOutcome::Rejected(Rejection::BadSignature),
            Err(e) => return VerifyOutcome::Rejected(Rejection::MalformedProof(e.to_string())),
        }

        self.finalize(&id, &bound, signed_message, proof_blob)
    }

    /// Move the record to VERIFIED, resolving unique-index violations by
    /// re-reading who holds the address.
    fn finalize(
        &self,
        id: &VerificationId,
        address: &str,
        signed_message: &str,
        proof_blob: &str,
    ) -> VerifyOutcome {
        for _ in 0..FINALIZE_ATTEMPTS {
            let result =
                self.ctx
                    .store
                    .finalize_proof(id, signed_message, proof_blob, self.ctx.now());
            match result {
                Ok(FinalizeOutcome::Finalized(p)) | Ok(FinalizeOutcome::AlreadyVerified(p)) => {
                    return VerifyOutcome::Verified(p)
                }
                // Reaped between the read above and this write.
                Ok(FinalizeOutcome::Missing) => {
                    return VerifyOutcome::Rejected(Rejection::UnknownProof)
                }
                Ok(FinalizeOutcome::NotPending(_)) => {
                    return VerifyOutcome::Rejected(Rejection::AddressNotBound)
                }
                Err(StoreError::Duplicate(_)) => match self.ledger.holder(address) {
                    Ok(Some(holder)) if &holder == id => continue,
                    Ok(Some(_)) => return VerifyOutcome::Rejected(Rejection::AddressTaken),
                    Ok(None) => continue,
                    Err(e) => return VerifyOutcome::Error(e.to_string()),
                },
                Err(e) => return VerifyOutcome::Error(e.to_string()),
            }
        }
        VerifyOutcome::Error(format!(
            "verified-address index for {address} kept changing"
        ))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
