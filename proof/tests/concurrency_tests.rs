//! Races between mobile scans, run against both storage backends.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use ergauth_crypto::{keypair_from_seed, sign_message, NetworkPrefix, OsRandom};
use ergauth_nullables::{NullClock, NullStore};
use ergauth_proof::{ProofEngine, ProofError, ProofSettings, Rejection, VerifyOutcome};
use ergauth_store::{ProofBackend, ProofStore, UserStore};
use ergauth_store_lmdb::LmdbEnvironment;
use ergauth_types::{ErgoProof, PendingUser, ProofStatus, Timestamp, UserId, VerificationId};

const RACERS: u8 = 8;

fn engine<S: ProofBackend>(store: Arc<S>) -> ProofEngine<S> {
    ProofEngine::new(
        store,
        Arc::new(NullClock::new(1_000)),
        Arc::new(OsRandom),
        ProofSettings::default(),
    )
}

fn seed_flow<S: ProofBackend>(store: &S, id: &str, user: &str, nonce: &str) {
    let now = Timestamp::new(1_000);
    let mut account = PendingUser::new(UserId::new(user), now);
    account.rotate_nonce(nonce.to_string(), now);
    store.put_user(&account).unwrap();
    store
        .insert_proof(&ErgoProof::initiated(
            VerificationId::new(id),
            account.id.clone(),
            account.nonce_generation,
            now,
        ))
        .unwrap();
}

fn address(seed: u8) -> String {
    keypair_from_seed(&[seed; 32])
        .p2pk_address(NetworkPrefix::Mainnet)
        .to_base58()
}

/// N threads bind distinct addresses to one fresh record.
fn exactly_one_bind_wins<S: ProofBackend>(store: Arc<S>) {
    seed_flow(store.as_ref(), "abc123", "primary1", "sign-me-42");
    let engine = engine(store.clone());
    let addresses: Vec<String> = (1..=RACERS).map(address).collect();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = addresses
            .iter()
            .map(|addr| {
                let engine = &engine;
                s.spawn(move || engine.binder.bind("abc123", Some(addr)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(ProofError::NotFound(_)))));

    let stored = store
        .get_proof(&VerificationId::new("abc123"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ProofStatus::Pending);
    assert_eq!(stored.default_address, winners[0].proof.default_address);
}

/// N accounts bound the same wallet; all submit valid signatures at once.
fn exactly_one_account_verifies_an_address<S: ProofBackend>(store: Arc<S>) {
    let kp = keypair_from_seed(&[42; 32]);
    let wallet = kp.p2pk_address(NetworkPrefix::Mainnet).to_base58();
    let engine = engine(store.clone());

    let flows: Vec<(String, String, String)> = (0..RACERS)
        .map(|i| {
            let id = format!("proof-{i}");
            let nonce = format!("nonce-{i}");
            seed_flow(store.as_ref(), &id, &format!("user-{i}"), &nonce);
            engine.binder.bind(&id, Some(&wallet)).unwrap();
            let sig = BASE64.encode(sign_message(&kp, nonce.as_bytes()));
            (id, nonce, sig)
        })
        .collect();

    let outcomes: Vec<VerifyOutcome> = std::thread::scope(|s| {
        let handles: Vec<_> = flows
            .iter()
            .map(|(id, nonce, sig)| {
                let engine = &engine;
                s.spawn(move || engine.verifier.verify(Some(id), Some(nonce), Some(sig)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let verified = outcomes
        .iter()
        .filter(|o| matches!(o, VerifyOutcome::Verified(_)))
        .count();
    assert_eq!(verified, 1);
    assert!(outcomes.iter().all(|o| matches!(
        o,
        VerifyOutcome::Verified(_) | VerifyOutcome::Rejected(Rejection::AddressTaken)
    )));

    let verified_rows = flows
        .iter()
        .filter_map(|(id, _, _)| store.get_proof(&VerificationId::new(id.as_str())).unwrap())
        .filter(|p| p.is_verified())
        .count();
    assert_eq!(verified_rows, 1);
}

#[test]
fn concurrent_binds_null_store() {
    exactly_one_bind_wins(Arc::new(NullStore::new()));
}

#[test]
fn concurrent_binds_lmdb() {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), 64 * 1024 * 1024).expect("open env");
    exactly_one_bind_wins(Arc::new(env));
}

#[test]
fn concurrent_verifies_null_store() {
    exactly_one_account_verifies_an_address(Arc::new(NullStore::new()));
}

#[test]
fn concurrent_verifies_lmdb() {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), 64 * 1024 * 1024).expect("open env");
    exactly_one_account_verifies_an_address(Arc::new(env));
}
