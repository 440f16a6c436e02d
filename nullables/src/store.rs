//! Nullable store — thread-safe in-memory storage for testing.

use ergauth_store::{BindOutcome, FinalizeOutcome, ProofStore, StoreError, UserStore};
use ergauth_types::{ErgoProof, PendingUser, Timestamp, UserId, VerificationId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, PendingUser>,
    proofs: HashMap<VerificationId, ErgoProof>,
    /// Unique index: address -> record holding its verified proof.
    verified: HashMap<String, VerificationId>,
}

/// An in-memory user + proof store for testing.
///
/// Every operation holds one lock for its whole duration, which gives the
/// conditional updates the same atomicity an LMDB write transaction does.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail with a backend error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored accounts.
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store set to fail".into()));
        }
        Ok(())
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for NullStore {
    fn get_user(&self, id: &UserId) -> Result<Option<PendingUser>, StoreError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().users.get(id).cloned())
    }

    fn put_user(&self, user: &PendingUser) -> Result<(), StoreError> {
        self.check()?;
        self.tables
            .lock()
            .unwrap()
            .users
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn rotate_nonce(
        &self,
        id: &UserId,
        nonce: &str,
        now: Timestamp,
    ) -> Result<PendingUser, StoreError> {
        self.check()?;
        let mut guard = self.tables.lock().unwrap();
        let tables = &mut *guard;
        let last_generation = tables
            .proofs
            .values()
            .filter(|p| &p.user_id == id)
            .map(|p| p.nonce_generation)
            .max()
            .unwrap_or(0);
        let user = tables
            .users
            .entry(id.clone())
            .or_insert_with(|| PendingUser::resume(id.clone(), last_generation, now));
        user.rotate_nonce(nonce.to_string(), now);
        Ok(user.clone())
    }

    fn delete_user_if_pending(&self, id: &UserId) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let pending = tables.users.get(id).is_some_and(|u| u.is_pending());
        let owns_verified = tables
            .proofs
            .values()
            .any(|p| &p.user_id == id && p.is_verified());
        if !pending || owns_verified {
            return Ok(false);
        }
        tables.users.remove(id);
        tables.proofs.retain(|_, p| &p.user_id != id);
        Ok(true)
    }
}

impl ProofStore for NullStore {
    fn insert_proof(&self, proof: &ErgoProof) -> Result<(), StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.proofs.contains_key(&proof.verification_id) {
            return Err(StoreError::Duplicate(proof.verification_id.to_string()));
        }
        tables
            .proofs
            .insert(proof.verification_id.clone(), proof.clone());
        Ok(())
    }

    fn get_proof(&self, id: &VerificationId) -> Result<Option<ErgoProof>, StoreError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().proofs.get(id).cloned())
    }

    fn bind_address(
        &self,
        id: &VerificationId,
        address: &str,
        now: Timestamp,
    ) -> Result<BindOutcome, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(holder) = tables.verified.get(address) {
            return Ok(BindOutcome::AddressTaken {
                holder: holder.clone(),
            });
        }
        let Some(proof) = tables.proofs.get_mut(id) else {
            return Ok(BindOutcome::NoMatch);
        };
        if !proof.bind(address, now) {
            return Ok(BindOutcome::NoMatch);
        }
        Ok(BindOutcome::Bound(proof.clone()))
    }

    fn finalize_proof(
        &self,
        id: &VerificationId,
        signed_message: &str,
        proof: &str,
        now: Timestamp,
    ) -> Result<FinalizeOutcome, StoreError> {
        self.check()?;
        let mut guard = self.tables.lock().unwrap();
        let tables = &mut *guard;
        let Some(record) = tables.proofs.get_mut(id) else {
            return Ok(FinalizeOutcome::Missing);
        };
        if record.is_verified() {
            return Ok(FinalizeOutcome::AlreadyVerified(record.clone()));
        }
        let Some(address) = record.default_address.clone() else {
            return Ok(FinalizeOutcome::NotPending(record.status));
        };
        if tables.verified.get(&address).is_some_and(|holder| holder != id) {
            return Err(StoreError::Duplicate(address));
        }
        if !record.finalize(signed_message, proof, now) {
            return Ok(FinalizeOutcome::NotPending(record.status));
        }
        tables.verified.insert(address, id.clone());
        Ok(FinalizeOutcome::Finalized(record.clone()))
    }

    fn verified_holder(&self, address: &str) -> Result<Option<VerificationId>, StoreError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().verified.get(address).cloned())
    }

    fn sweep_expired(&self, ttl_secs: u64, now: Timestamp) -> Result<usize, StoreError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.proofs.len();
        tables.proofs.retain(|_, p| !p.is_expired(ttl_secs, now));
        Ok(before - tables.proofs.len())
    }

    fn proof_count(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().proofs.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initiated(id: &str, user: &str, at: u64) -> ErgoProof {
        ErgoProof::initiated(
            VerificationId::new(id),
            UserId::new(user),
            1,
            Timestamp::new(at),
        )
    }

    #[test]
    fn bind_is_compare_and_set() {
        let store = NullStore::new();
        store.insert_proof(&initiated("v1", "u1", 0)).unwrap();
        let id = VerificationId::new("v1");

        let first = store.bind_address(&id, "addrA", Timestamp::new(5)).unwrap();
        assert!(matches!(first, BindOutcome::Bound(_)));
        let second = store.bind_address(&id, "addrB", Timestamp::new(6)).unwrap();
        assert_eq!(second, BindOutcome::NoMatch);

        let stored = store.get_proof(&id).unwrap().unwrap();
        assert_eq!(stored.default_address.as_deref(), Some("addrA"));
    }

    #[test]
    fn finalize_claims_address_exclusively() {
        let store = NullStore::new();
        store.insert_proof(&initiated("v1", "u1", 0)).unwrap();
        store.insert_proof(&initiated("v2", "u2", 0)).unwrap();
        let (v1, v2) = (VerificationId::new("v1"), VerificationId::new("v2"));
        store.bind_address(&v1, "addr", Timestamp::new(1)).unwrap();
        store.bind_address(&v2, "addr", Timestamp::new(1)).unwrap();

        let done = store.finalize_proof(&v1, "m", "p", Timestamp::new(2)).unwrap();
        assert!(matches!(done, FinalizeOutcome::Finalized(_)));
        assert!(matches!(
            store.finalize_proof(&v2, "m", "p", Timestamp::new(2)),
            Err(StoreError::Duplicate(_))
        ));
        assert_eq!(store.verified_holder("addr").unwrap(), Some(v1.clone()));
        assert!(matches!(
            store.finalize_proof(&v1, "m", "p", Timestamp::new(3)).unwrap(),
            FinalizeOutcome::AlreadyVerified(_)
        ));
    }

    #[test]
    fn delete_user_only_while_pending_and_unverified() {
        let store = NullStore::new();
        let uid = UserId::new("u1");
        store.rotate_nonce(&uid, "n", Timestamp::new(0)).unwrap();
        assert!(store.delete_user_if_pending(&uid).unwrap());
        assert!(!store.delete_user_if_pending(&uid).unwrap());
    }

    #[test]
    fn deleting_a_user_drops_its_open_proofs() {
        let store = NullStore::new();
        let uid = UserId::new("u1");
        store.rotate_nonce(&uid, "n", Timestamp::new(0)).unwrap();
        store.insert_proof(&initiated("mine", "u1", 0)).unwrap();
        store.insert_proof(&initiated("theirs", "u2", 0)).unwrap();

        assert!(store.delete_user_if_pending(&uid).unwrap());
        assert!(store.get_proof(&VerificationId::new("mine")).unwrap().is_none());
        assert!(store.get_proof(&VerificationId::new("theirs")).unwrap().is_some());
    }

    #[test]
    fn recreated_user_starts_above_surviving_proofs() {
        let store = NullStore::new();
        let uid = UserId::new("u1");
        let mut old = initiated("old", "u1", 0);
        old.nonce_generation = 4;
        store.insert_proof(&old).unwrap();

        let user = store.rotate_nonce(&uid, "n", Timestamp::new(1)).unwrap();
        assert_eq!(user.nonce_generation, 5);
    }

    #[test]
    fn failing_store_reports_backend_errors() {
        let store = NullStore::new();
        store.set_failing(true);
        assert!(matches!(
            store.get_proof(&VerificationId::new("x")),
            Err(StoreError::Backend(_))
        ));
    }
}
