//! LMDB implementation of UserStore.

use ergauth_store::{StoreError, UserStore};
use ergauth_types::{ErgoProof, PendingUser, Timestamp, UserId};

use crate::environment::{decode, encode};
use crate::{LmdbEnvironment, LmdbError};

impl UserStore for LmdbEnvironment {
    fn get_user(&self, id: &UserId) -> Result<Option<PendingUser>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let user = match self.users_db.get(&rtxn, id.as_str()).map_err(LmdbError::from)? {
            Some(bytes) => Some(decode(bytes)?),
            None => None,
        };
        Ok(user)
    }

    fn put_user(&self, user: &PendingUser) -> Result<(), StoreError> {
        let bytes = encode(user)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.users_db
            .put(&mut wtxn, user.id.as_str(), bytes.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn rotate_nonce(
        &self,
        id: &UserId,
        nonce: &str,
        now: Timestamp,
    ) -> Result<PendingUser, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut user = match self.users_db.get(&wtxn, id.as_str()).map_err(LmdbError::from)? {
            Some(bytes) => decode::<PendingUser>(bytes)?,
            None => {
                let mut last_generation = 0;
                for entry in self.proofs_db.iter(&wtxn).map_err(LmdbError::from)? {
                    let (_, bytes) = entry.map_err(LmdbError::from)?;
                    let proof: ErgoProof = decode(bytes)?;
                    if &proof.user_id == id {
                        last_generation = last_generation.max(proof.nonce_generation);
                    }
                }
                PendingUser::resume(id.clone(), last_generation, now)
            }
        };
        user.rotate_nonce(nonce.to_string(), now);
        let bytes = encode(&user)?;
        self.users_db
            .put(&mut wtxn, id.as_str(), bytes.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(user)
    }

    fn delete_user_if_pending(&self, id: &UserId) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let pending = match self.users_db.get(&wtxn, id.as_str()).map_err(LmdbError::from)? {
            Some(bytes) => decode::<PendingUser>(bytes)?.is_pending(),
            None => false,
        };
        if !pending {
            return Ok(false);
        }

        let mut owned = Vec::new();
        for entry in self.proofs_db.iter(&wtxn).map_err(LmdbError::from)? {
            let (key, bytes) = entry.map_err(LmdbError::from)?;
            let proof: ErgoProof = decode(bytes)?;
            if &proof.user_id != id {
                continue;
            }
            if proof.is_verified() {
                return Ok(false);
            }
            owned.push(key.to_string());
        }

        for key in &owned {
            self.proofs_db
                .delete(&mut wtxn, key)
                .map_err(LmdbError::from)?;
        }
        let deleted = self
            .users_db
            .delete(&mut wtxn, id.as_str())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        if !owned.is_empty() {
            tracing::debug!(user = %id, proofs = owned.len(), "dropped proofs of discarded user");
        }
        Ok(deleted)
    }
}
