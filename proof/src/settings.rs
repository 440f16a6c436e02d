//! Settings shared by every proof component.

use ergauth_crypto::NetworkPrefix;

/// Abandoned proofs are reclaimed this long after their last update.
pub const DEFAULT_PROOF_TTL_SECS: u64 = 20 * 60;

/// Path of the signature callback, relative to the public base URL.
pub const VERIFY_PATH: &str = "/ergo-mobile-proof/verify";

#[derive(Clone, Debug)]
pub struct ProofSettings {
    /// Network whose addresses may be bound.
    pub network: NetworkPrefix,
    /// Externally reachable origin of this service, e.g.
    /// `https://auth.example.org`. Embedded in every challenge's `replyTo`.
    pub public_base_url: String,
    pub proof_ttl_secs: u64,
}

impl ProofSettings {
    /// Callback URL a wallet posts its signature to.
    pub fn reply_to(&self, verification_id: &str) -> String {
        format!(
            "{}{}?verificationId={}",
            self.public_base_url.trim_end_matches('/'),
            VERIFY_PATH,
            verification_id
        )
    }
}

impl Default for ProofSettings {
    fn default() -> Self {
        Self {
            network: NetworkPrefix::Mainnet,
            public_base_url: "http://localhost:7080".to_string(),
            proof_ttl_secs: DEFAULT_PROOF_TTL_SECS,
        }
    }
}
