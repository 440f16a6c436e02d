//! Pending accounts owned by the primary-chain login subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Timestamp, TypesError};

/// Account identifier: the primary-chain address the account is keyed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse a caller-supplied id, rejecting blank input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Created by a challenge request, not yet logged in.
    Pending,
    /// Promoted by a completed primary-chain login.
    Active,
}

/// An account holding the current signing nonce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUser {
    pub id: UserId,
    /// Current challenge text; `None` until a nonce is issued.
    pub nonce: Option<String>,
    /// Bumped on every nonce issue. Proofs stamped with an older
    /// generation can no longer be verified.
    pub nonce_generation: u64,
    pub status: UserStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PendingUser {
    pub fn new(id: UserId, now: Timestamp) -> Self {
        Self::resume(id, 0, now)
    }

    /// A fresh account whose generations continue after `last_generation`.
    ///
    /// Proofs left behind by an earlier account with the same id keep a
    /// generation this account never reaches again.
    pub fn resume(id: UserId, last_generation: u64, now: Timestamp) -> Self {
        Self {
            id,
            nonce: None,
            nonce_generation: last_generation,
            status: UserStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the nonce and advance the generation.
    pub fn rotate_nonce(&mut self, nonce: String, now: Timestamp) {
        self.nonce = Some(nonce);
        self.nonce_generation += 1;
        self.updated_at = now;
    }

    pub fn is_pending(&self) -> bool {
        self.status == UserStatus::Pending
    }
}
