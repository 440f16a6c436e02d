//! Ergo address codec.
//!
//! Address format: `base58(head ‖ content ‖ checksum)`
//!
//! - `head = network | type` (mainnet `0x00`, testnet `0x10`; P2PK `1`,
//!   P2SH `2`, P2S `3`)
//! - P2PK content is a 33-byte compressed public key, P2SH content a 24-byte
//!   script hash, P2S content the full ErgoTree
//! - checksum: first 4 bytes of Blake2b-256(`head ‖ content`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::hash::{checksum, CHECKSUM_LEN};
use crate::sigma::ProveDlog;
use crate::CryptoError;

const P2SH_HASH_LEN: usize = 24;

const TYPE_P2PK: u8 = 1;
const TYPE_P2SH: u8 = 2;
const TYPE_P2S: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPrefix {
    Mainnet,
    Testnet,
}

impl NetworkPrefix {
    pub fn byte(&self) -> u8 {
        match self {
            NetworkPrefix::Mainnet => 0x00,
            NetworkPrefix::Testnet => 0x10,
        }
    }

    pub fn from_byte(b: u8) -> Result<Self, CryptoError> {
        match b {
            0x00 => Ok(NetworkPrefix::Mainnet),
            0x10 => Ok(NetworkPrefix::Testnet),
            other => Err(CryptoError::UnknownNetwork(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkPrefix::Mainnet => "mainnet",
            NetworkPrefix::Testnet => "testnet",
        }
    }
}

impl FromStr for NetworkPrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkPrefix::Mainnet),
            "testnet" | "test" => Ok(NetworkPrefix::Testnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressKind {
    /// Pay-to-public-key.
    P2pk(ProveDlog),
    /// Pay-to-script-hash; only the hash is known.
    P2sh([u8; P2SH_HASH_LEN]),
    /// Pay-to-script, carrying the serialized ErgoTree.
    P2s(Vec<u8>),
}

impl AddressKind {
    fn type_byte(&self) -> u8 {
        match self {
            AddressKind::P2pk(_) => TYPE_P2PK,
            AddressKind::P2sh(_) => TYPE_P2SH,
            AddressKind::P2s(_) => TYPE_P2S,
        }
    }

    fn content(&self) -> Vec<u8> {
        match self {
            AddressKind::P2pk(dlog) => dlog.to_bytes().to_vec(),
            AddressKind::P2sh(hash) => hash.to_vec(),
            AddressKind::P2s(tree) => tree.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErgoAddress {
    pub network: NetworkPrefix,
    pub kind: AddressKind,
}

impl ErgoAddress {
    pub fn p2pk(network: NetworkPrefix, dlog: ProveDlog) -> Self {
        Self {
            network,
            kind: AddressKind::P2pk(dlog),
        }
    }

    /// Decode and checksum-verify a base58 address string.
    pub fn parse(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| CryptoError::InvalidBase58(e.to_string()))?;
        if bytes.len() <= 1 + CHECKSUM_LEN {
            return Err(CryptoError::AddressTooShort(bytes.len()));
        }

        let (body, expected) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        if checksum(body)[..] != *expected {
            return Err(CryptoError::ChecksumMismatch);
        }

        let head = body[0];
        let content = &body[1..];
        let network = NetworkPrefix::from_byte(head & 0xF0)?;
        let kind = match head & 0x0F {
            TYPE_P2PK => AddressKind::P2pk(ProveDlog::from_bytes(content)?),
            TYPE_P2SH => {
                let hash: [u8; P2SH_HASH_LEN] = content
                    .try_into()
                    .map_err(|_| CryptoError::InvalidScriptHash(content.len()))?;
                AddressKind::P2sh(hash)
            }
            TYPE_P2S => AddressKind::P2s(content.to_vec()),
            other => return Err(CryptoError::UnknownAddressType(other)),
        };

        Ok(Self { network, kind })
    }

    /// Encode as a base58 address string.
    pub fn to_base58(&self) -> String {
        let mut body = vec![self.network.byte() | self.kind.type_byte()];
        body.extend_from_slice(&self.kind.content());
        let sum = checksum(&body);
        body.extend_from_slice(&sum);
        bs58::encode(body).into_string()
    }

    pub fn is_p2pk(&self) -> bool {
        matches!(self.kind, AddressKind::P2pk(_))
    }

    /// The public-key statement behind a P2PK address.
    pub fn prove_dlog(&self) -> Option<&ProveDlog> {
        match &self.kind {
            AddressKind::P2pk(dlog) => Some(dlog),
            _ => None,
        }
    }

    /// The spending script of this address.
    ///
    /// P2SH addresses only commit to a hash of their script, so they have
    /// no tree to hand out.
    pub fn script_tree_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        match &self.kind {
            AddressKind::P2pk(dlog) => Ok(dlog.ergo_tree_bytes()),
            AddressKind::P2s(tree) => Ok(tree.clone()),
            AddressKind::P2sh(_) => Err(CryptoError::NoScriptTree),
        }
    }
}

impl fmt::Display for ErgoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for ErgoAddress {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
