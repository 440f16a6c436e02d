//! LMDB implementation of ProofStore.
//!
//! The `verified_addresses` database is the storage-layer unique constraint
//! for verified addresses: [`ProofStore::finalize_proof`] checks and writes
//! it in the same write transaction that flips the record to VERIFIED.

use ergauth_store::{BindOutcome, FinalizeOutcome, ProofStore, StoreError};
use ergauth_types::{ErgoProof, Timestamp, VerificationId};

use crate::environment::{decode, encode};
use crate::{LmdbEnvironment, LmdbError};

impl ProofStore for LmdbEnvironment {
    fn insert_proof(&self, proof: &ErgoProof) -> Result<(), StoreError> {
        let key = proof.verification_id.as_str();
        let bytes = encode(proof)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .proofs_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(key.to_string()));
        }
        self.proofs_db
            .put(&mut wtxn, key, bytes.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_proof(&self, id: &VerificationId) -> Result<Option<ErgoProof>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let proof = match self.proofs_db.get(&rtxn, id.as_str()).map_err(LmdbError::from)? {
            Some(bytes) => Some(decode(bytes)?),
            None => None,
        };
        Ok(proof)
    }

    fn bind_address(
        &self,
        id: &VerificationId,
        address: &str,
        now: Timestamp,
    ) -> Result<BindOutcome, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        if let Some(holder) = self.verified_db.get(&wtxn, address).map_err(LmdbError::from)? {
            return Ok(BindOutcome::AddressTaken {
                holder: VerificationId::new(holder),
            });
        }

        let mut proof: ErgoProof = match self.proofs_db.get(&wtxn, id.as_str()).map_err(LmdbError::from)? {
            Some(bytes) => decode(bytes)?,
            None => return Ok(BindOutcome::NoMatch),
        };
        if !proof.bind(address, now) {
            return Ok(BindOutcome::NoMatch);
        }

        let bytes = encode(&proof)?;
        self.proofs_db
            .put(&mut wtxn, id.as_str(), bytes.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(BindOutcome::Bound(proof))
    }

    fn finalize_proof(
        &self,
        id: &VerificationId,
        signed_message: &str,
        proof_blob: &str,
        now: Timestamp,
    ) -> Result<FinalizeOutcome, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let mut record: ErgoProof = match self.proofs_db.get(&wtxn, id.as_str()).map_err(LmdbError::from)? {
            Some(bytes) => decode(bytes)?,
            None => return Ok(FinalizeOutcome::Missing),
        };
        if record.is_verified() {
            return Ok(FinalizeOutcome::AlreadyVerified(record));
        }
        let Some(address) = record.default_address.clone() else {
            return Ok(FinalizeOutcome::NotPending(record.status));
        };

        if let Some(holder) = self.verified_db.get(&wtxn, &address).map_err(LmdbError::from)? {
            if holder != id.as_str() {
                return Err(StoreError::Duplicate(address));
            }
        }
        if !record.finalize(signed_message, proof_blob, now) {
            return Ok(FinalizeOutcome::NotPending(record.status));
        }

        let bytes = encode(&record)?;
        self.proofs_db
            .put(&mut wtxn, id.as_str(), bytes.as_slice())
            .map_err(LmdbError::from)?;
        self.verified_db
            .put(&mut wtxn, &address, id.as_str())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(FinalizeOutcome::Finalized(record))
    }

    fn verified_holder(&self, address: &str) -> Result<Option<VerificationId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let holder = self
            .verified_db
            .get(&rtxn, address)
            .map_err(LmdbError::from)?
            .map(VerificationId::new);
        Ok(holder)
    }

    fn sweep_expired(&self, ttl_secs: u64, now: Timestamp) -> Result<usize, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let mut expired = Vec::new();
        for entry in self.proofs_db.iter(&wtxn).map_err(LmdbError::from)? {
            let (key, bytes) = entry.map_err(LmdbError::from)?;
            let proof: ErgoProof = decode(bytes)?;
            if proof.is_expired(ttl_secs, now) {
                expired.push(key.to_string());
            }
        }

        for key in &expired {
            self.proofs_db
                .delete(&mut wtxn, key)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(expired.len())
    }

    fn proof_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.proofs_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
