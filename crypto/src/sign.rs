//! Schnorr sigma proofs for `ProveDlog` statements.
//!
//! Proof layout: `e (24 bytes) ‖ z (32 bytes, big-endian)`.
//!
//! Verification recomputes the prover's commitment `a = g^z · h^-e`, feeds
//! the Fiat-Shamir leaf for (proposition, commitment) followed by the
//! message through Blake2b-256, and accepts when the first 24 bytes of the
//! digest equal `e`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::{Field, PrimeField};
use k256::{FieldBytes, ProjectivePoint, Scalar, U256};
use rand::rngs::OsRng;

use crate::hash::blake2b_256_multi;
use crate::keys::KeyPair;
use crate::sigma::{ProveDlog, GROUP_ELEMENT_LEN};
use crate::CryptoError;

/// Challenge length; 192-bit soundness.
pub const SOUNDNESS_BYTES: usize = 24;
/// Length of the response scalar.
pub const SCALAR_BYTES: usize = 32;
/// Total proof length for a single `ProveDlog` leaf.
pub const PROOF_LEN: usize = SOUNDNESS_BYTES + SCALAR_BYTES;

/// Fiat-Shamir tree node tag for a leaf.
const LEAF_PREFIX: u8 = 0x01;

/// Check `proof` against `statement` and `message`.
///
/// `Ok(false)` means a well-formed proof that does not verify. Malformed
/// proofs are errors.
pub fn verify_signature(
    statement: &ProveDlog,
    message: &[u8],
    proof: &[u8],
) -> Result<bool, CryptoError> {
    if proof.len() != PROOF_LEN {
        return Err(CryptoError::InvalidProofLength {
            expected: PROOF_LEN,
            actual: proof.len(),
        });
    }

    let (e_bytes, z_bytes) = proof.split_at(SOUNDNESS_BYTES);
    let z = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(z_bytes)))
        .ok_or(CryptoError::InvalidProofScalar)?;
    let e = challenge_scalar(e_bytes);

    let commitment = ProjectivePoint::GENERATOR * z - statement.point() * e;
    let expected = fiat_shamir_challenge(statement, &encode_point(&commitment), message);

    Ok(expected[..] == *e_bytes)
}

/// Produce a proof of knowledge of `keypair`'s secret over `message`.
pub fn sign_message(keypair: &KeyPair, message: &[u8]) -> Vec<u8> {
    let statement = keypair.prove_dlog();
    let r = Scalar::random(&mut OsRng);
    let commitment = ProjectivePoint::GENERATOR * r;

    let e_bytes = fiat_shamir_challenge(&statement, &encode_point(&commitment), message);
    let z = r + challenge_scalar(&e_bytes) * keypair.secret_scalar();

    let mut proof = Vec::with_capacity(PROOF_LEN);
    proof.extend_from_slice(&e_bytes);
    proof.extend_from_slice(&z.to_repr());
    proof
}

/// Decode a proof as carried by the mobile wallet (standard base64).
pub fn decode_proof_base64(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| CryptoError::InvalidProofEncoding(e.to_string()))
}

fn fiat_shamir_challenge(
    statement: &ProveDlog,
    commitment: &[u8; GROUP_ELEMENT_LEN],
    message: &[u8],
) -> [u8; SOUNDNESS_BYTES] {
    let prop = statement.segregated_tree_bytes();

    let mut leaf = Vec::with_capacity(1 + 2 + prop.len() + 2 + GROUP_ELEMENT_LEN);
    leaf.push(LEAF_PREFIX);
    leaf.extend_from_slice(&(prop.len() as u16).to_be_bytes());
    leaf.extend_from_slice(&prop);
    leaf.extend_from_slice(&(GROUP_ELEMENT_LEN as u16).to_be_bytes());
    leaf.extend_from_slice(commitment);

    let digest = blake2b_256_multi(&[&leaf, message]);
    let mut out = [0u8; SOUNDNESS_BYTES];
    out.copy_from_slice(&digest[..SOUNDNESS_BYTES]);
    out
}

/// Interpret the 24-byte challenge as an unsigned big-endian scalar.
fn challenge_scalar(e_bytes: &[u8]) -> Scalar {
    let mut wide = [0u8; SCALAR_BYTES];
    wide[SCALAR_BYTES - e_bytes.len()..].copy_from_slice(e_bytes);
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(wide))
}

/// Compressed encoding; the identity is 33 zero bytes.
fn encode_point(point: &ProjectivePoint) -> [u8; GROUP_ELEMENT_LEN] {
    let mut out = [0u8; GROUP_ELEMENT_LEN];
    if *point == ProjectivePoint::IDENTITY {
        return out;
    }
    let encoded = point.to_affine().to_encoded_point(true);
    out.copy_from_slice(encoded.as_bytes());
    out
}
