//! Cryptographic primitives for Ergo wallet ownership proofs.
//!
//! - **Address codec**: base58 Ergo addresses with Blake2b-256 checksums
//! - **Sigma predicates**: the `ProveDlog` statement behind a P2PK address
//! - **Schnorr sigma proofs** over secp256k1 with a Blake2b Fiat-Shamir hash
//! - Random capability tokens and nonces

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod random;
pub mod sigma;
pub mod sign;

pub use address::{AddressKind, ErgoAddress, NetworkPrefix};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_seed, KeyPair};
pub use random::{random_token, OsRandom, RandomSource};
pub use sigma::{sigma_boolean_base64, ProveDlog};
pub use sign::{decode_proof_base64, sign_message, verify_signature};
