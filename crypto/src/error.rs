use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("address is not valid base58: {0}")]
    InvalidBase58(String),

    #[error("address is too short ({0} bytes)")]
    AddressTooShort(usize),

    #[error("address checksum mismatch")]
    ChecksumMismatch,

    #[error("unknown network prefix: {0:#04x}")]
    UnknownNetwork(u8),

    #[error("unknown address type: {0}")]
    UnknownAddressType(u8),

    #[error("invalid secp256k1 public key")]
    InvalidPublicKey,

    #[error("invalid P2SH script hash length: {0}")]
    InvalidScriptHash(usize),

    #[error("address carries no script tree")]
    NoScriptTree,

    #[error("script tree too short to hold a sigma predicate")]
    ScriptTooShort,

    #[error("invalid proof length: expected {expected}, got {actual}")]
    InvalidProofLength { expected: usize, actual: usize },

    #[error("proof is not valid base64: {0}")]
    InvalidProofEncoding(String),

    #[error("proof response scalar is out of range")]
    InvalidProofScalar,
}
