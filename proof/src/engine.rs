//! One handle over every proof component, sharing a single context.

use std::sync::Arc;

use ergauth_crypto::RandomSource;
use ergauth_store::ProofBackend;
use ergauth_types::Clock;

use crate::{
    AddressBinder, ChallengeBuilder, ExpiryReaper, NonceIssuer, ProofContext, ProofInitiator,
    ProofSettings, SignatureVerifier, UserProofLedger,
};

pub struct ProofEngine<S> {
    pub nonces: NonceIssuer<S>,
    pub initiator: ProofInitiator<S>,
    pub challenges: ChallengeBuilder<S>,
    pub binder: AddressBinder<S>,
    pub verifier: SignatureVerifier<S>,
    pub reaper: ExpiryReaper<S>,
    pub ledger: UserProofLedger<S>,
}

impl<S: ProofBackend> ProofEngine<S> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        settings: ProofSettings,
    ) -> Self {
        let ctx = ProofContext::new(store, clock, random, settings);
        Self {
            nonces: NonceIssuer::new(ctx.clone()),
            initiator: ProofInitiator::new(ctx.clone()),
            challenges: ChallengeBuilder::new(ctx.clone()),
            binder: AddressBinder::new(ctx.clone()),
            verifier: SignatureVerifier::new(ctx.clone()),
            reaper: ExpiryReaper::new(ctx.clone()),
            ledger: UserProofLedger::new(ctx),
        }
    }
}
