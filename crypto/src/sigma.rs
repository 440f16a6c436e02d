//! Sigma predicates for pay-to-public-key addresses.
//!
//! A P2PK address spends under a single `ProveDlog(pk)` statement: the
//! spender must prove knowledge of `w` such that `g^w = pk`. The wallet is
//! handed that statement in its serialized form (the "sigmaBoolean").
//!
//! Byte layouts produced here:
//! - ErgoTree:           `00 08 cd ‖ pk33`
//! - sigmaBoolean:       `cd ‖ pk33` (the ErgoTree minus its two format bytes)
//! - segregated ErgoTree `10 01 08 cd ‖ pk33 ‖ 73 00`, hashed into the
//!   Fiat-Shamir challenge

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, PublicKey};

use crate::CryptoError;

/// ErgoTree header: version 0, no constant segregation.
pub const TREE_HEADER_V0: u8 = 0x00;
/// ErgoTree header: version 0 with constant segregation.
pub const TREE_HEADER_SEGREGATED: u8 = 0x10;
/// Type code of a `SigmaProp` constant.
pub const SIGMA_PROP_TYPE: u8 = 0x08;
/// Serialization code of a `ProveDlog` sigma boolean.
pub const PROVE_DLOG_CODE: u8 = 0xcd;
/// Opcode of a constant placeholder in a segregated tree.
pub const CONSTANT_PLACEHOLDER_OP: u8 = 0x73;

/// Length of a compressed secp256k1 point.
pub const GROUP_ELEMENT_LEN: usize = 33;

/// Number of format bytes preceding the sigma predicate in a plain ErgoTree.
const TREE_FORMAT_PREFIX_LEN: usize = 2;

/// `ProveDlog(pk)`: knowledge of the discrete log of `pk`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProveDlog(PublicKey);

impl ProveDlog {
    pub fn new(public_key: PublicKey) -> Self {
        Self(public_key)
    }

    /// Parse a 33-byte compressed point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != GROUP_ELEMENT_LEN {
            return Err(CryptoError::InvalidPublicKey);
        }
        PublicKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    pub fn point(&self) -> ProjectivePoint {
        self.0.to_projective()
    }

    /// Compressed SEC1 encoding.
    pub fn to_bytes(&self) -> [u8; GROUP_ELEMENT_LEN] {
        let encoded = self.0.to_encoded_point(true);
        let mut out = [0u8; GROUP_ELEMENT_LEN];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// The ErgoTree a P2PK address stands for.
    pub fn ergo_tree_bytes(&self) -> Vec<u8> {
        let mut tree = Vec::with_capacity(3 + GROUP_ELEMENT_LEN);
        tree.extend_from_slice(&[TREE_HEADER_V0, SIGMA_PROP_TYPE, PROVE_DLOG_CODE]);
        tree.extend_from_slice(&self.to_bytes());
        tree
    }

    /// Serialized sigma boolean, `cd ‖ pk33`.
    pub fn sigma_boolean_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + GROUP_ELEMENT_LEN);
        out.push(PROVE_DLOG_CODE);
        out.extend_from_slice(&self.to_bytes());
        out
    }

    /// The proposition as a constant-segregated ErgoTree, the form fed into
    /// the Fiat-Shamir hash.
    pub fn segregated_tree_bytes(&self) -> Vec<u8> {
        let mut tree = Vec::with_capacity(6 + GROUP_ELEMENT_LEN);
        tree.extend_from_slice(&[TREE_HEADER_SEGREGATED, 0x01, SIGMA_PROP_TYPE, PROVE_DLOG_CODE]);
        tree.extend_from_slice(&self.to_bytes());
        tree.extend_from_slice(&[CONSTANT_PLACEHOLDER_OP, 0x00]);
        tree
    }
}

/// Strip the two leading serialization-format bytes from an ErgoTree and
/// base64-encode the remainder.
pub fn sigma_boolean_base64(ergo_tree: &[u8]) -> Result<String, CryptoError> {
    if ergo_tree.len() <= TREE_FORMAT_PREFIX_LEN {
        return Err(CryptoError::ScriptTooShort);
    }
    Ok(BASE64.encode(&ergo_tree[TREE_FORMAT_PREFIX_LEN..]))
}
