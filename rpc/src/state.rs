//! Shared state behind every handler.

use std::sync::Arc;

use ergauth_proof::ProofEngine;
use ergauth_store::ProofBackend;

use crate::metrics::ProofMetrics;
use crate::RpcError;

pub struct RpcState<S> {
    pub engine: ProofEngine<S>,
    pub metrics: Arc<ProofMetrics>,
}

impl<S: ProofBackend + 'static> RpcState<S> {
    pub fn new(engine: ProofEngine<S>, metrics: Arc<ProofMetrics>) -> Self {
        Self { engine, metrics }
    }
}

/// Run a store-bound operation on the blocking pool.
pub(crate) async fn blocking<S, T, F>(state: &Arc<RpcState<S>>, f: F) -> Result<T, RpcError>
where
    S: ProofBackend + 'static,
    T: Send + 'static,
    F: FnOnce(&RpcState<S>) -> T + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| RpcError::Internal(format!("worker task failed: {e}")))
}
