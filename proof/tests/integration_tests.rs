//! End-to-end tests of the proof flow against the in-memory store:
//! nonce → initiate → challenge → bind → verify → sweep.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use ergauth_crypto::{
    keypair_from_seed, sign_message, AddressKind, ErgoAddress, KeyPair, NetworkPrefix, OsRandom,
    RandomSource,
};
use ergauth_nullables::{NullClock, NullRandom, NullStore};
use ergauth_proof::{
    MessageSeverity, ProofEngine, ProofError, ProofSettings, Rejection, VerifyOutcome,
};
use ergauth_store::{ProofStore, UserStore};
use ergauth_types::{ErgoProof, PendingUser, ProofStatus, Timestamp, UserId, VerificationId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const START: u64 = 1_700_000_000;

struct Harness {
    store: Arc<NullStore>,
    clock: Arc<NullClock>,
    engine: ProofEngine<NullStore>,
}

fn harness() -> Harness {
    harness_with_random(Arc::new(OsRandom))
}

fn harness_with_random(random: Arc<dyn RandomSource>) -> Harness {
    let store = Arc::new(NullStore::new());
    let clock = Arc::new(NullClock::new(START));
    let engine = ProofEngine::new(store.clone(), clock.clone(), random, ProofSettings::default());
    Harness {
        store,
        clock,
        engine,
    }
}

fn wallet(seed: u8) -> (KeyPair, String) {
    let kp = keypair_from_seed(&[seed; 32]);
    let address = kp.p2pk_address(NetworkPrefix::Mainnet).to_base58();
    (kp, address)
}

fn signature(kp: &KeyPair, message: &str) -> String {
    BASE64.encode(sign_message(kp, message.as_bytes()))
}

/// A pending account `user` holding `nonce`, plus an INITIATED proof `id`.
fn seed_flow(h: &Harness, id: &str, user: &str, nonce: &str) {
    let now = Timestamp::new(START);
    let mut account = PendingUser::new(UserId::new(user), now);
    account.rotate_nonce(nonce.to_string(), now);
    h.store.put_user(&account).unwrap();
    h.store
        .insert_proof(&ErgoProof::initiated(
            VerificationId::new(id),
            account.id.clone(),
            account.nonce_generation,
            now,
        ))
        .unwrap();
}

fn stored(h: &Harness, id: &str) -> Option<ErgoProof> {
    h.store.get_proof(&VerificationId::new(id)).unwrap()
}

// ---------------------------------------------------------------------------
// Bind + verify scenarios
// ---------------------------------------------------------------------------

#[test]
fn bind_then_verify_with_owner_key() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);

    let bound = h.engine.binder.bind("abc123", Some(&address)).unwrap();
    assert_eq!(bound.proof.status, ProofStatus::Pending);
    assert_eq!(bound.severity, MessageSeverity::Information);

    let outcome = h.engine.verifier.verify(
        Some("abc123"),
        Some("sign-me-42"),
        Some(&signature(&kp, "sign-me-42")),
    );
    let VerifyOutcome::Verified(proof) = outcome else {
        panic!("expected Verified, got {outcome:?}");
    };
    assert_eq!(proof.status, ProofStatus::Verified);
    assert_eq!(proof.signed_message.as_deref(), Some("sign-me-42"));
    assert_eq!(proof.default_address.as_deref(), Some(address.as_str()));
    assert!(h.engine.ledger.has_verified_proof(&address).unwrap());
}

#[test]
fn signature_from_another_key_is_rejected() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (_, address) = wallet(1);
    let (intruder, _) = wallet(2);

    h.engine.binder.bind("abc123", Some(&address)).unwrap();
    let outcome = h.engine.verifier.verify(
        Some("abc123"),
        Some("sign-me-42"),
        Some(&signature(&intruder, "sign-me-42")),
    );
    assert_eq!(outcome, VerifyOutcome::Rejected(Rejection::BadSignature));
    assert_eq!(stored(&h, "abc123").unwrap().status, ProofStatus::Pending);
    assert!(!h.engine.ledger.has_verified_proof(&address).unwrap());
}

#[test]
fn signature_over_other_text_is_rejected() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);

    h.engine.binder.bind("abc123", Some(&address)).unwrap();
    let outcome = h.engine.verifier.verify(
        Some("abc123"),
        Some("sign-me-42"),
        Some(&signature(&kp, "something-else")),
    );
    assert_eq!(outcome, VerifyOutcome::Rejected(Rejection::BadSignature));
}

#[test]
fn second_bind_finds_nothing_to_match() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (_, first) = wallet(1);
    let (_, second) = wallet(2);

    h.engine.binder.bind("abc123", Some(&first)).unwrap();
    let again = h.engine.binder.bind("abc123", Some(&second));
    assert!(matches!(again, Err(ProofError::NotFound(_))));
    assert_eq!(
        stored(&h, "abc123").unwrap().default_address.as_deref(),
        Some(first.as_str())
    );
}

#[test]
fn bind_on_unknown_id_is_not_found() {
    let h = harness();
    let (_, address) = wallet(1);
    assert!(matches!(
        h.engine.binder.bind("nope", Some(&address)),
        Err(ProofError::NotFound(_))
    ));
}

#[test]
fn verify_on_unbound_record_rejects() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, _) = wallet(1);

    let outcome = h.engine.verifier.verify(
        Some("abc123"),
        Some("sign-me-42"),
        Some(&signature(&kp, "sign-me-42")),
    );
    assert_eq!(outcome, VerifyOutcome::Rejected(Rejection::AddressNotBound));
    assert_eq!(stored(&h, "abc123").unwrap().status, ProofStatus::Initiated);
}

#[test]
fn verify_requires_every_input() {
    let h = harness();
    assert_eq!(
        h.engine.verifier.verify(None, Some("m"), Some("p")),
        VerifyOutcome::Rejected(Rejection::MissingInput("verificationId"))
    );
    assert_eq!(
        h.engine.verifier.verify(Some("abc123"), Some("  "), Some("p")),
        VerifyOutcome::Rejected(Rejection::MissingInput("signedMessage"))
    );
    assert_eq!(
        h.engine.verifier.verify(Some("abc123"), Some("m"), None),
        VerifyOutcome::Rejected(Rejection::MissingInput("proof"))
    );
}

#[test]
fn verify_on_unknown_id_rejects() {
    let h = harness();
    assert_eq!(
        h.engine.verifier.verify(Some("nope"), Some("m"), Some("cA==")),
        VerifyOutcome::Rejected(Rejection::UnknownProof)
    );
}

#[test]
fn undecodable_proof_is_malformed() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (_, address) = wallet(1);
    h.engine.binder.bind("abc123", Some(&address)).unwrap();

    let outcome = h
        .engine
        .verifier
        .verify(Some("abc123"), Some("sign-me-42"), Some("not base64!"));
    assert!(matches!(
        outcome,
        VerifyOutcome::Rejected(Rejection::MalformedProof(_))
    ));
    let short = h
        .engine
        .verifier
        .verify(Some("abc123"), Some("sign-me-42"), Some("AAAA"));
    assert!(matches!(
        short,
        VerifyOutcome::Rejected(Rejection::MalformedProof(_))
    ));
}

#[test]
fn reissued_nonce_invalidates_outstanding_proof() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);
    h.engine.binder.bind("abc123", Some(&address)).unwrap();

    let fresh = h.engine.nonces.issue("primary1").unwrap();
    let nonce = fresh.nonce.unwrap();
    let outcome = h.engine.verifier.verify(
        Some("abc123"),
        Some(&nonce),
        Some(&signature(&kp, &nonce)),
    );
    assert_eq!(outcome, VerifyOutcome::Rejected(Rejection::StaleNonce));
    assert!(Rejection::StaleNonce.is_authentication_failure());
}

#[test]
fn verify_is_safe_to_retry() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);
    h.engine.binder.bind("abc123", Some(&address)).unwrap();
    let sig = signature(&kp, "sign-me-42");

    let first = h
        .engine
        .verifier
        .verify(Some("abc123"), Some("sign-me-42"), Some(&sig));
    h.clock.advance(30);
    let second = h
        .engine
        .verifier
        .verify(Some("abc123"), Some("sign-me-42"), Some(&sig));
    assert!(matches!(first, VerifyOutcome::Verified(_)));
    assert_eq!(first, second);
}

#[test]
fn verified_address_cannot_be_bound_by_another_account() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    seed_flow(&h, "xyz789", "primary2", "other-nonce");
    let (kp, address) = wallet(1);

    h.engine.binder.bind("abc123", Some(&address)).unwrap();
    let outcome = h.engine.verifier.verify(
        Some("abc123"),
        Some("sign-me-42"),
        Some(&signature(&kp, "sign-me-42")),
    );
    assert!(matches!(outcome, VerifyOutcome::Verified(_)));

    assert!(matches!(
        h.engine.binder.bind("xyz789", Some(&address)),
        Err(ProofError::Conflict(_))
    ));
    assert_eq!(stored(&h, "xyz789").unwrap().status, ProofStatus::Initiated);
}

#[test]
fn second_account_loses_the_finalize_race() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "nonce-a");
    seed_flow(&h, "xyz789", "primary2", "nonce-b");
    let (kp, address) = wallet(1);

    // Both bind before either verifies, so only the unique index stops the
    // second finalize.
    h.engine.binder.bind("abc123", Some(&address)).unwrap();
    h.engine.binder.bind("xyz789", Some(&address)).unwrap();

    let a = h
        .engine
        .verifier
        .verify(Some("abc123"), Some("nonce-a"), Some(&signature(&kp, "nonce-a")));
    let b = h
        .engine
        .verifier
        .verify(Some("xyz789"), Some("nonce-b"), Some(&signature(&kp, "nonce-b")));
    assert!(matches!(a, VerifyOutcome::Verified(_)));
    assert_eq!(b, VerifyOutcome::Rejected(Rejection::AddressTaken));
    assert_eq!(stored(&h, "xyz789").unwrap().status, ProofStatus::Pending);
}

// ---------------------------------------------------------------------------
// Address validation
// ---------------------------------------------------------------------------

#[test]
fn bind_rejects_unusable_addresses() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let kp = keypair_from_seed(&[1; 32]);

    let testnet = kp.p2pk_address(NetworkPrefix::Testnet).to_base58();
    let p2sh = ErgoAddress {
        network: NetworkPrefix::Mainnet,
        kind: AddressKind::P2sh([7; 24]),
    }
    .to_base58();
    let p2s = ErgoAddress {
        network: NetworkPrefix::Mainnet,
        kind: AddressKind::P2s(kp.prove_dlog().ergo_tree_bytes()),
    }
    .to_base58();

    for address in [
        None,
        Some(""),
        Some("multiple"),
        Some("garbage-address"),
        Some(testnet.as_str()),
        Some(p2sh.as_str()),
        Some(p2s.as_str()),
    ] {
        let result = h.engine.binder.bind("abc123", address);
        assert!(
            matches!(result, Err(ProofError::Validation(_))),
            "{address:?} should be refused, got {result:?}"
        );
    }
    assert_eq!(stored(&h, "abc123").unwrap().status, ProofStatus::Initiated);
}

#[test]
fn bind_requires_an_id() {
    let h = harness();
    let (_, address) = wallet(1);
    assert!(matches!(
        h.engine.binder.bind("  ", Some(&address)),
        Err(ProofError::Validation(_))
    ));
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

#[test]
fn challenge_carries_nonce_predicate_and_callback() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);

    let challenge = h.engine.challenges.build("abc123", Some(&address)).unwrap();
    assert_eq!(challenge.address, address);
    assert_eq!(challenge.signing_message, "sign-me-42");
    assert_eq!(
        challenge.sigma_boolean,
        BASE64.encode(kp.prove_dlog().sigma_boolean_bytes())
    );
    assert_eq!(
        challenge.reply_to,
        "http://localhost:7080/ergo-mobile-proof/verify?verificationId=abc123"
    );
    assert_eq!(challenge.severity, MessageSeverity::Information);

    let again = h.engine.challenges.build("abc123", Some(&address)).unwrap();
    assert_eq!(challenge, again);
}

#[test]
fn challenge_follows_the_requested_address_not_the_bound_one() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (_, bound) = wallet(1);
    let (other, requested) = wallet(2);
    h.engine.binder.bind("abc123", Some(&bound)).unwrap();

    let challenge = h
        .engine
        .challenges
        .build("abc123", Some(&requested))
        .unwrap();
    assert_eq!(challenge.address, requested);
    assert_eq!(
        challenge.sigma_boolean,
        BASE64.encode(other.prove_dlog().sigma_boolean_bytes())
    );
    assert_eq!(
        stored(&h, "abc123").unwrap().default_address.as_deref(),
        Some(bound.as_str())
    );
}

#[test]
fn challenge_for_missing_proof_is_unprocessable() {
    let h = harness();
    let (_, address) = wallet(1);
    assert!(matches!(
        h.engine.challenges.build("nope", Some(&address)),
        Err(ProofError::Unprocessable(_))
    ));
}

#[test]
fn challenge_without_address_discards_pending_owner() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    assert_eq!(h.store.user_count(), 1);

    assert!(matches!(
        h.engine.challenges.build("abc123", None),
        Err(ProofError::Unprocessable(_))
    ));
    assert_eq!(h.store.user_count(), 0);
}

#[test]
fn challenge_for_user_without_nonce_discards_pending_owner() {
    let h = harness();
    let uid = UserId::new("primary1");
    let now = Timestamp::new(START);
    h.store.put_user(&PendingUser::new(uid.clone(), now)).unwrap();
    h.store
        .insert_proof(&ErgoProof::initiated(
            VerificationId::new("abc123"),
            uid,
            0,
            now,
        ))
        .unwrap();
    let (_, address) = wallet(1);

    assert!(matches!(
        h.engine.challenges.build("abc123", Some(&address)),
        Err(ProofError::Unprocessable(_))
    ));
    assert_eq!(h.store.user_count(), 0);
}

#[test]
fn challenge_for_scriptless_address_is_internal_error() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let p2sh = ErgoAddress {
        network: NetworkPrefix::Mainnet,
        kind: AddressKind::P2sh([7; 24]),
    }
    .to_base58();

    assert!(matches!(
        h.engine.challenges.build("abc123", Some(&p2sh)),
        Err(ProofError::Internal(_))
    ));
    assert_eq!(h.store.user_count(), 0);
}

#[test]
fn challenge_after_nonce_reissue_keeps_the_account() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    h.engine.nonces.issue("primary1").unwrap();
    let (_, address) = wallet(1);

    assert!(matches!(
        h.engine.challenges.build("abc123", Some(&address)),
        Err(ProofError::Unprocessable(_))
    ));
    assert_eq!(h.store.user_count(), 1);
}

#[test]
fn discarded_account_takes_its_open_proofs_along() {
    let h = harness();
    let (kp, address) = wallet(1);
    h.engine.nonces.issue("primary1").unwrap();
    let first = h.engine.initiator.initiate("primary1").unwrap();
    let second = h.engine.initiator.initiate("primary1").unwrap();
    let first_id = first.verification_id.as_str();

    assert!(h
        .engine
        .challenges
        .build(second.verification_id.as_str(), None)
        .is_err());
    assert_eq!(h.store.user_count(), 0);
    assert_eq!(stored(&h, first_id), None);

    let fresh = h.engine.nonces.issue("primary1").unwrap();
    let nonce = fresh.nonce.unwrap();
    assert!(matches!(
        h.engine.challenges.build(first_id, Some(&address)),
        Err(ProofError::Unprocessable(_))
    ));
    assert!(matches!(
        h.engine.binder.bind(first_id, Some(&address)),
        Err(ProofError::NotFound(_))
    ));
    assert_eq!(
        h.engine
            .verifier
            .verify(Some(first_id), Some(&nonce), Some(&signature(&kp, &nonce))),
        VerifyOutcome::Rejected(Rejection::UnknownProof)
    );
}

#[test]
fn record_orphaned_by_cleanup_stays_stale_after_reissue() {
    let h = harness();
    let (kp, address) = wallet(1);
    let issued = h.engine.nonces.issue("primary1").unwrap();
    let id = h.engine.initiator.initiate("primary1").unwrap().verification_id;
    assert!(h.engine.challenges.build(id.as_str(), None).is_err());

    // A record written after the account was already discarded.
    let late = ErgoProof::initiated(
        VerificationId::new("late"),
        issued.id.clone(),
        issued.nonce_generation,
        Timestamp::new(START),
    );
    h.store.insert_proof(&late).unwrap();

    let fresh = h.engine.nonces.issue("primary1").unwrap();
    assert!(fresh.nonce_generation > late.nonce_generation);
    let nonce = fresh.nonce.unwrap();

    assert!(matches!(
        h.engine.challenges.build("late", Some(&address)),
        Err(ProofError::Unprocessable(_))
    ));
    h.engine.binder.bind("late", Some(&address)).unwrap();
    assert_eq!(
        h.engine
            .verifier
            .verify(Some("late"), Some(&nonce), Some(&signature(&kp, &nonce))),
        VerifyOutcome::Rejected(Rejection::StaleNonce)
    );
}

#[test]
fn cleanup_spares_owner_of_a_verified_proof() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);
    h.engine.binder.bind("abc123", Some(&address)).unwrap();
    h.engine.verifier.verify(
        Some("abc123"),
        Some("sign-me-42"),
        Some(&signature(&kp, "sign-me-42")),
    );

    assert!(h.engine.challenges.build("abc123", None).is_err());
    assert_eq!(h.store.user_count(), 1);
}

// ---------------------------------------------------------------------------
// Nonces and initiation
// ---------------------------------------------------------------------------

#[test]
fn issuing_nonces_creates_and_rotates_account() {
    let h = harness();
    let first = h.engine.nonces.issue("primary1").unwrap();
    let second = h.engine.nonces.issue("primary1").unwrap();

    assert_eq!(first.nonce_generation, 1);
    assert_eq!(second.nonce_generation, 2);
    assert_ne!(first.nonce, second.nonce);
    assert_eq!(second.nonce.as_ref().map(String::len), Some(64));
    assert!(second.is_pending());
    assert_eq!(h.store.user_count(), 1);

    assert!(matches!(
        h.engine.nonces.issue("   "),
        Err(ProofError::Validation(_))
    ));
}

#[test]
fn nonce_issue_surfaces_storage_failure() {
    let h = harness();
    h.store.set_failing(true);
    assert!(matches!(
        h.engine.nonces.issue("primary1"),
        Err(ProofError::Internal(_))
    ));
}

#[test]
fn initiate_stamps_current_generation() {
    let h = harness();
    h.engine.nonces.issue("primary1").unwrap();
    h.engine.nonces.issue("primary1").unwrap();

    let proof = h.engine.initiator.initiate("primary1").unwrap();
    assert_eq!(proof.status, ProofStatus::Initiated);
    assert_eq!(proof.nonce_generation, 2);
    assert_eq!(proof.verification_id.as_str().len(), 64);
    assert_eq!(proof.created_at, Timestamp::new(START));
    assert_eq!(stored(&h, proof.verification_id.as_str()), Some(proof.clone()));

    let other = h.engine.initiator.initiate("primary1").unwrap();
    assert_ne!(other.verification_id, proof.verification_id);
}

#[test]
fn initiate_for_unknown_user_is_not_found() {
    let h = harness();
    assert!(matches!(
        h.engine.initiator.initiate("ghost"),
        Err(ProofError::NotFound(_))
    ));
}

#[test]
fn initiate_retries_past_a_colliding_id() {
    // nonce, first id, then a repeat of the first id before a fresh one
    let h = harness_with_random(Arc::new(NullRandom::new(vec![1, 2, 2, 3])));
    h.engine.nonces.issue("primary1").unwrap();

    let first = h.engine.initiator.initiate("primary1").unwrap();
    let second = h.engine.initiator.initiate("primary1").unwrap();
    assert_eq!(first.verification_id.as_str(), "02".repeat(32));
    assert_eq!(second.verification_id.as_str(), "03".repeat(32));
}

#[test]
fn initiate_gives_up_when_every_id_collides() {
    let h = harness_with_random(Arc::new(NullRandom::constant(0x11)));
    h.engine.nonces.issue("primary1").unwrap();

    h.engine.initiator.initiate("primary1").unwrap();
    assert!(matches!(
        h.engine.initiator.initiate("primary1"),
        Err(ProofError::Internal(_))
    ));
    assert_eq!(h.store.proof_count().unwrap(), 1);
}

#[test]
fn full_flow_through_the_engine() {
    let h = harness();
    let (kp, address) = wallet(9);

    h.engine.nonces.issue("primary1").unwrap();
    let proof = h.engine.initiator.initiate("primary1").unwrap();
    let id = proof.verification_id.as_str();

    let challenge = h.engine.challenges.build(id, Some(&address)).unwrap();
    h.clock.advance(5);
    h.engine.binder.bind(id, Some(&address)).unwrap();
    h.clock.advance(5);

    let outcome = h.engine.verifier.verify(
        Some(id),
        Some(&challenge.signing_message),
        Some(&signature(&kp, &challenge.signing_message)),
    );
    let VerifyOutcome::Verified(done) = outcome else {
        panic!("expected Verified, got {outcome:?}");
    };
    assert_eq!(done.updated_at, Timestamp::new(START + 10));
    assert_eq!(done.created_at, Timestamp::new(START));
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

#[test]
fn sweep_respects_the_twenty_minute_boundary() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");

    h.clock.set(START + 19 * 60 + 59);
    assert_eq!(h.engine.reaper.sweep().unwrap(), 0);
    assert!(stored(&h, "abc123").is_some());

    h.clock.set(START + 20 * 60 + 1);
    assert_eq!(h.engine.reaper.sweep().unwrap(), 1);
    assert!(stored(&h, "abc123").is_none());
}

#[test]
fn sweep_measures_from_the_last_transition() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (_, address) = wallet(1);

    h.clock.set(START + 15 * 60);
    h.engine.binder.bind("abc123", Some(&address)).unwrap();

    h.clock.set(START + 25 * 60);
    assert_eq!(h.engine.reaper.sweep().unwrap(), 0);
    h.clock.set(START + 35 * 60);
    assert_eq!(h.engine.reaper.sweep().unwrap(), 1);
}

#[test]
fn sweep_never_removes_verified_proofs() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);
    h.engine.binder.bind("abc123", Some(&address)).unwrap();
    h.engine.verifier.verify(
        Some("abc123"),
        Some("sign-me-42"),
        Some(&signature(&kp, "sign-me-42")),
    );

    h.clock.set(START + 365 * 24 * 3600);
    assert_eq!(h.engine.reaper.sweep().unwrap(), 0);
    assert!(stored(&h, "abc123").unwrap().is_verified());
}

#[test]
fn reaped_record_can_no_longer_be_bound_or_verified() {
    let h = harness();
    seed_flow(&h, "abc123", "primary1", "sign-me-42");
    let (kp, address) = wallet(1);

    h.clock.set(START + 21 * 60);
    h.engine.reaper.sweep().unwrap();

    assert!(matches!(
        h.engine.binder.bind("abc123", Some(&address)),
        Err(ProofError::NotFound(_))
    ));
    assert_eq!(
        h.engine.verifier.verify(
            Some("abc123"),
            Some("sign-me-42"),
            Some(&signature(&kp, "sign-me-42"))
        ),
        VerifyOutcome::Rejected(Rejection::UnknownProof)
    );
}
