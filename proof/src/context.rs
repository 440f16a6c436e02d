//! Shared handles every proof component is built from.

use std::sync::Arc;

use ergauth_crypto::RandomSource;
use ergauth_store::ProofBackend;
use ergauth_types::{Clock, Timestamp};

use crate::ProofSettings;

/// Store, clock, randomness and settings, cheaply cloneable.
pub struct ProofContext<S> {
    pub store: Arc<S>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
    pub settings: ProofSettings,
}

impl<S: ProofBackend> ProofContext<S> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        settings: ProofSettings,
    ) -> Self {
        Self {
            store,
            clock,
            random,
            settings,
        }
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

impl<S> Clone for ProofContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            random: Arc::clone(&self.random),
            settings: self.settings.clone(),
        }
    }
}
