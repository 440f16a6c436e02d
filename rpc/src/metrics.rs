//! Prometheus metrics for the proof endpoints.
//!
//! [`ProofMetrics`] owns a dedicated [`Registry`]; `GET /metrics` encodes it
//! into the Prometheus text exposition format.

use prometheus::{register_int_counter_with_registry, Encoder, IntCounter, Opts, Registry, TextEncoder};

use crate::RpcError;

pub struct ProofMetrics {
    pub registry: Registry,

    // ── Challenges ──────────────────────────────────────────────────────
    pub challenges_built: IntCounter,
    pub challenges_failed: IntCounter,

    // ── Binding ─────────────────────────────────────────────────────────
    pub binds_accepted: IntCounter,
    /// Address already verified by another account.
    pub binds_conflicted: IntCounter,
    /// No INITIATED record matched (unknown id or lost the race).
    pub binds_not_found: IntCounter,
    pub binds_invalid: IntCounter,

    // ── Verification ────────────────────────────────────────────────────
    pub verifications_verified: IntCounter,
    pub verifications_rejected: IntCounter,
    pub verifications_errored: IntCounter,

    // ── Expiry ──────────────────────────────────────────────────────────
    pub proofs_reaped: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
    register_int_counter_with_registry!(Opts::new(name, help), registry)
        .unwrap_or_else(|e| panic!("failed to register {name}: {e}"))
}

impl ProofMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();
        Self {
            challenges_built: counter(
                &registry,
                "ergauth_challenges_built_total",
                "Signing challenges handed to wallets",
            ),
            challenges_failed: counter(
                &registry,
                "ergauth_challenges_failed_total",
                "Challenge requests that failed",
            ),
            binds_accepted: counter(
                &registry,
                "ergauth_binds_accepted_total",
                "Addresses bound to a proof record",
            ),
            binds_conflicted: counter(
                &registry,
                "ergauth_binds_conflicted_total",
                "Binds refused because the address is already verified",
            ),
            binds_not_found: counter(
                &registry,
                "ergauth_binds_not_found_total",
                "Binds that matched no INITIATED record",
            ),
            binds_invalid: counter(
                &registry,
                "ergauth_binds_invalid_total",
                "Binds refused for malformed input",
            ),
            verifications_verified: counter(
                &registry,
                "ergauth_verifications_verified_total",
                "Signatures accepted",
            ),
            verifications_rejected: counter(
                &registry,
                "ergauth_verifications_rejected_total",
                "Signature submissions rejected",
            ),
            verifications_errored: counter(
                &registry,
                "ergauth_verifications_errored_total",
                "Signature submissions that hit an internal error",
            ),
            proofs_reaped: counter(
                &registry,
                "ergauth_proofs_reaped_total",
                "Abandoned proof records deleted by the expiry sweep",
            ),
            registry,
        }
    }

    /// Encode every registered metric in the text exposition format.
    pub fn encode(&self) -> Result<String, RpcError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| RpcError::Internal(format!("metrics encoding: {e}")))?;
        String::from_utf8(buf).map_err(|e| RpcError::Internal(format!("metrics encoding: {e}")))
    }
}

impl Default for ProofMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_counters() {
        let metrics = ProofMetrics::new();
        metrics.binds_accepted.inc();
        metrics.proofs_reaped.inc_by(3);
        let text = metrics.encode().unwrap();
        assert!(text.contains("ergauth_binds_accepted_total 1"));
        assert!(text.contains("ergauth_proofs_reaped_total 3"));
    }
}
