//! Wallet ownership proof records and their status machine.
//!
//! A proof row is the only shared state between the desktop session that
//! starts a flow and the mobile wallet that completes it. Both sides address
//! the row through its [`VerificationId`], which doubles as the capability
//! that authorises acting on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Timestamp, TypesError, UserId};

/// Opaque, unguessable capability token identifying one proof record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerificationId(String);

impl VerificationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse a caller-supplied id, rejecting blank input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyVerificationId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a proof record. Transitions only move forward.
///
/// Abandoned rows are hard-deleted by the expiry sweep, so there is no
/// terminal "expired" state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofStatus {
    /// Created by the desktop session; no address bound yet.
    Initiated,
    /// An address has been bound; waiting for the wallet's signature.
    Pending,
    /// The signature checked out against the bound address.
    Verified,
}

impl ProofStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofStatus::Initiated => "INITIATED",
            ProofStatus::Pending => "PENDING",
            ProofStatus::Verified => "VERIFIED",
        }
    }

    /// Whether a record in this state may move to `next`.
    pub fn can_advance_to(&self, next: ProofStatus) -> bool {
        matches!(
            (self, next),
            (ProofStatus::Initiated, ProofStatus::Pending)
                | (ProofStatus::Pending, ProofStatus::Verified)
        )
    }
}

impl fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofStatus {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIATED" => Ok(ProofStatus::Initiated),
            "PENDING" => Ok(ProofStatus::Pending),
            "VERIFIED" => Ok(ProofStatus::Verified),
            other => Err(TypesError::UnknownStatus(other.to_string())),
        }
    }
}

/// One wallet ownership verification attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErgoProof {
    pub verification_id: VerificationId,
    pub user_id: UserId,
    pub status: ProofStatus,
    /// Bound address; set only from `Pending` onward.
    pub default_address: Option<String>,
    /// Currently single-valued.
    pub addresses: Vec<String>,
    pub signed_message: Option<String>,
    /// Opaque signature blob as received on the wire.
    pub proof: Option<String>,
    /// Owner's nonce generation at the time the record was created.
    pub nonce_generation: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ErgoProof {
    pub fn initiated(
        verification_id: VerificationId,
        user_id: UserId,
        nonce_generation: u64,
        now: Timestamp,
    ) -> Self {
        Self {
            verification_id,
            user_id,
            status: ProofStatus::Initiated,
            default_address: None,
            addresses: Vec::new(),
            signed_message: None,
            proof: None,
            nonce_generation,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bind `address` and move to `Pending`.
    ///
    /// Returns `false` and leaves the record untouched unless it is
    /// currently `Initiated`.
    pub fn bind(&mut self, address: &str, now: Timestamp) -> bool {
        if !self.status.can_advance_to(ProofStatus::Pending) {
            return false;
        }
        self.default_address = Some(address.to_string());
        self.addresses = vec![address.to_string()];
        self.status = ProofStatus::Pending;
        self.updated_at = now;
        true
    }

    /// Record the signature and move to `Verified`.
    ///
    /// Returns `false` and leaves the record untouched unless it is
    /// currently `Pending`.
    pub fn finalize(&mut self, signed_message: &str, proof: &str, now: Timestamp) -> bool {
        if !self.status.can_advance_to(ProofStatus::Verified) {
            return false;
        }
        self.signed_message = Some(signed_message.to_string());
        self.proof = Some(proof.to_string());
        self.status = ProofStatus::Verified;
        self.updated_at = now;
        true
    }

    pub fn is_verified(&self) -> bool {
        self.status == ProofStatus::Verified
    }

    /// Whether the expiry sweep should reclaim this record.
    pub fn is_expired(&self, ttl_secs: u64, now: Timestamp) -> bool {
        !self.is_verified() && self.updated_at.has_expired(ttl_secs, now)
    }
}
