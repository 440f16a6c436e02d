//! Binding one Ergo address to a proof record.

use ergauth_crypto::ErgoAddress;
use ergauth_store::{BindOutcome, ProofBackend};
use ergauth_types::{ErgoProof, VerificationId};

use crate::challenge::MessageSeverity;
use crate::ledger::UserProofLedger;
use crate::{ProofContext, ProofError};

/// Wallets put this marker in the address field when the user selected
/// more than one address.
const MULTIPLE_MARKER: &str = "multiple";

pub const ADDRESS_TAKEN_MESSAGE: &str = "This address is already attached to an account";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindResult {
    pub proof: ErgoProof,
    pub message: String,
    pub severity: MessageSeverity,
}

pub struct AddressBinder<S> {
    ctx: ProofContext<S>,
    ledger: UserProofLedger<S>,
}

impl<S: ProofBackend> AddressBinder<S> {
    pub fn new(ctx: ProofContext<S>) -> Self {
        Self {
            ledger: UserProofLedger::new(ctx.clone()),
            ctx,
        }
    }

    /// Claim `address` for the INITIATED record `verification_id`.
    ///
    /// The transition is a compare-and-set in the store: of any number of
    /// concurrent binds on one record, exactly one succeeds and the rest see
    /// [`ProofError::NotFound`].
    pub fn bind(
        &self,
        verification_id: &str,
        address: Option<&str>,
    ) -> Result<BindResult, ProofError> {
        let id = VerificationId::parse(verification_id)
            .map_err(|e| ProofError::Validation(e.to_string()))?;
        let address = self.check_address(address)?;

        if self.ledger.has_verified_proof(&address)? {
            tracing::info!(verification_id = %id, %address, "bind refused: address already verified");
            return Err(ProofError::Conflict(ADDRESS_TAKEN_MESSAGE.into()));
        }

        match self.ctx.store.bind_address(&id, &address, self.ctx.now())? {
            BindOutcome::Bound(proof) => {
                tracing::info!(verification_id = %id, %address, "address bound");
                Ok(BindResult {
                    proof,
                    message: format!("Address {address} is waiting for its signature"),
                    severity: MessageSeverity::Information,
                })
            }
            BindOutcome::NoMatch => Err(ProofError::NotFound(format!(
                "no unbound proof with id {id}"
            ))),
            BindOutcome::AddressTaken { holder } => {
                tracing::info!(verification_id = %id, %address, %holder, "bind lost to a verified proof");
                Err(ProofError::Conflict(ADDRESS_TAKEN_MESSAGE.into()))
            }
        }
    }

    /// Accept exactly one P2PK address on the configured network, returned
    /// in canonical encoding.
    fn check_address(&self, address: Option<&str>) -> Result<String, ProofError> {
        let raw = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ProofError::Validation("p2pkAddress is required".into()))?;
        if raw.contains(MULTIPLE_MARKER) {
            return Err(ProofError::Validation(
                "select a single address to verify".into(),
            ));
        }

        let parsed =
            ErgoAddress::parse(raw).map_err(|e| ProofError::Validation(e.to_string()))?;
        let network = self.ctx.settings.network;
        if parsed.network != network {
            return Err(ProofError::Validation(format!(
                "address is not a {} address",
                network.as_str()
            )));
        }
        if !parsed.is_p2pk() {
            return Err(ProofError::Validation(
                "only pay-to-public-key addresses can be verified".into(),
            ));
        }
        Ok(parsed.to_base58())
    }
}
