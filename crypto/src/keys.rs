//! secp256k1 key generation.
//!
//! Wallets own these keys in production; the service only needs them to
//! produce proofs in tests and tooling.

use k256::{FieldBytes, Scalar, SecretKey};
use rand::rngs::OsRng;

use crate::address::{ErgoAddress, NetworkPrefix};
use crate::hash::blake2b_256;
use crate::sigma::ProveDlog;

/// A secret key and its `ProveDlog` statement.
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: ProveDlog,
}

impl KeyPair {
    pub fn from_secret(secret: SecretKey) -> Self {
        let public = ProveDlog::new(secret.public_key());
        Self { secret, public }
    }

    pub fn prove_dlog(&self) -> ProveDlog {
        self.public.clone()
    }

    pub(crate) fn secret_scalar(&self) -> Scalar {
        *self.secret.to_nonzero_scalar().as_ref()
    }

    /// The pay-to-public-key address for this key on `network`.
    pub fn p2pk_address(&self, network: NetworkPrefix) -> ErgoAddress {
        ErgoAddress::p2pk(network, self.public.clone())
    }
}

/// Generate a new key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    KeyPair::from_secret(SecretKey::random(&mut OsRng))
}

/// Derive a key pair from a 32-byte seed (deterministic).
///
/// Seeds that are not a valid scalar are re-hashed until they are.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let mut material = *seed;
    loop {
        if let Ok(secret) = SecretKey::from_bytes(&FieldBytes::from(material)) {
            return KeyPair::from_secret(secret);
        }
        material = blake2b_256(&material);
    }
}
