//! # End-to-End Ledger Flows
//!
//! Anchor a root, prove a claim against it, and check the resulting
//! side effect or the exact failure kind, across the anchor, crypto and
//! registry crates.

use certgate_anchor::AnchorError;
use certgate_core::{ActorId, FieldElement, PayloadDigest, SubjectId};
use certgate_crypto::testing::{sign_ring, RingKeyPair, SparseMerkleTree, StubFieldHash};
use certgate_crypto::{FieldHash, RingPublicKey, RingVerifier, Sha256FieldHash};
use certgate_registry::{Claim, ClaimError, ClaimSubmission, Ledger, LedgerConfig, LedgerError};

fn owner() -> ActorId {
    ActorId::new("owner").unwrap()
}

fn subject(label: &str) -> SubjectId {
    SubjectId::from_label(label).unwrap()
}

fn ring(n: usize) -> (Vec<RingKeyPair>, Vec<RingPublicKey>) {
    let keys: Vec<_> = (0..n)
        .map(|i| RingKeyPair::from_seed(format!("student-{i}").as_bytes()))
        .collect();
    let publics = keys.iter().map(|k| *k.public_key()).collect();
    (keys, publics)
}

/// A tree with a handful of enrolled students.
fn roster<H: FieldHash + Clone>(hasher: H) -> SparseMerkleTree<H> {
    let mut tree = SparseMerkleTree::new(hasher);
    for (k, v) in [(11u64, 1u64), (12, 1), (13, 0), (14, 1)] {
        tree.insert(FieldElement::from_u64(k), FieldElement::from_u64(v));
    }
    tree
}

fn submission<H: FieldHash + Clone>(
    tree: &SparseMerkleTree<H>,
    subject: SubjectId,
    key: u64,
    payload: &[u8],
    signer: usize,
) -> ClaimSubmission {
    let (keys, publics) = ring(4);
    let key = FieldElement::from_u64(key);
    ClaimSubmission {
        subject,
        claim: Claim::new(key, *tree.get(&key).unwrap()),
        proof: tree.proof(&key).unwrap(),
        signature: sign_ring(payload, &publics, signer, &keys[signer]).unwrap(),
        payload: payload.to_vec(),
        metadata_uri: None,
    }
}

#[test]
fn capacity_three_keeps_last_three_roots() {
    let mut config = LedgerConfig::new(owner());
    config.capacity = 3;
    let mut ledger = Ledger::new(config).unwrap();
    let s = subject("S");
    let roots: Vec<_> = (1..=4).map(FieldElement::from_u64).collect();

    for root in &roots {
        ledger.append_state(&owner(), &[s.clone()], &[*root]).unwrap();
    }

    let history: Vec<_> = ledger.history(&s).iter().map(|e| e.root).collect();
    assert_eq!(history, roots[1..].to_vec());
    assert_eq!(ledger.last_root(&s).unwrap(), roots[3]);
    assert_eq!(ledger.last_block(&s).unwrap(), 4);
}

#[test]
fn first_feedback_on_fresh_log_is_index_zero() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();

    let sub = submission(&tree, course.clone(), 12, b"loved the labs", 2);
    assert_eq!(ledger.add_feedback(&sub).unwrap(), 0);
    assert_eq!(
        ledger.feedback_at(&course, 0),
        Some(PayloadDigest::of(b"loved the labs"))
    );
}

#[test]
fn empty_proof_aborts_and_leaves_log_unchanged() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();
    let block = ledger.current_block();

    let mut sub = submission(&tree, course.clone(), 11, b"x", 0);
    sub.proof.clear();
    let err = ledger.add_feedback(&sub).unwrap_err();

    assert!(matches!(err, LedgerError::Claim(ClaimError::EmptyProof)));
    assert_eq!(ledger.feedback_count(&course), 0);
    assert_eq!(ledger.current_block(), block);
}

#[test]
fn never_anchored_subject_reports_no_anchored_state() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let tree = roster(Sha256FieldHash);
    let sub = submission(&tree, subject("unknown"), 11, b"x", 0);

    let err = ledger.add_feedback(&sub).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Claim(ClaimError::NoAnchoredState { .. })
    ));
    let err = ledger.issue_credential(&sub).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Claim(ClaimError::NoAnchoredState { .. })
    ));
}

#[test]
fn claims_are_checked_against_the_latest_root_only() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let old_tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[old_tree.root()]).unwrap();

    let mut new_tree = roster(Sha256FieldHash);
    new_tree.insert(FieldElement::from_u64(15), FieldElement::from_u64(1));
    ledger.append_state(&owner(), &[course.clone()], &[new_tree.root()]).unwrap();

    let stale = submission(&old_tree, course.clone(), 11, b"x", 0);
    assert!(matches!(
        ledger.add_feedback(&stale).unwrap_err(),
        LedgerError::Claim(ClaimError::InclusionFailed { .. })
    ));

    let fresh = submission(&new_tree, course.clone(), 15, b"x", 0);
    assert_eq!(ledger.add_feedback(&fresh).unwrap(), 0);
}

#[test]
fn inclusion_is_checked_before_signature() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();

    let mut sub = submission(&tree, course, 13, b"x", 1);
    sub.claim.value = FieldElement::from_u64(1);
    sub.payload = b"tampered".to_vec();
    assert!(matches!(
        ledger.add_feedback(&sub).unwrap_err(),
        LedgerError::Claim(ClaimError::InclusionFailed { .. })
    ));
}

#[test]
fn tampered_signature_is_rejected_and_nothing_minted() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();

    let mut sub = submission(&tree, course.clone(), 14, b"diploma", 3);
    sub.signature.responses[1] = FieldElement::from_u64(12345);
    assert!(matches!(
        ledger.issue_credential(&sub).unwrap_err(),
        LedgerError::Claim(ClaimError::BadSignature)
    ));
    assert!(ledger.credential(&course, 0).is_none());
}

#[test]
fn non_writer_and_length_mismatch_mutate_nothing() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let s = subject("S");

    let err = ledger
        .append_state(&ActorId::new("mallory").unwrap(), &[s.clone()], &[FieldElement::one()])
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Anchor(AnchorError::NotAuthorized { .. })
    ));

    let err = ledger
        .append_state(&owner(), &[s.clone(), subject("T")], &[FieldElement::one()])
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Anchor(AnchorError::LengthMismatch { .. })
    ));

    assert!(ledger.history(&s).is_empty());
    assert_eq!(ledger.current_block(), 0);
}

#[test]
fn any_ring_member_can_sign_and_signatures_do_not_name_the_signer() {
    let (keys, publics) = ring(5);
    let verifier = RingVerifier::new();
    let signatures: Vec<_> = (0..5)
        .map(|j| sign_ring(b"anonymous", &publics, j, &keys[j]).unwrap())
        .collect();

    for sig in &signatures {
        assert!(verifier.verify(b"anonymous", sig).unwrap());
        assert_eq!(sig.public_keys, publics);
        assert_eq!(sig.challenges.len(), 5);
        assert_eq!(sig.responses.len(), 5);
    }
}

/// Run one feedback and one credential for the same claim through a fresh
/// ledger, signed by ring member `signer`.
fn run_as(signer: usize) -> (usize, u64, Ledger) {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();
    let sub = submission(&tree, course, 12, b"same words", signer);
    let index = ledger.add_feedback(&sub).unwrap();
    let token = ledger.issue_credential(&sub).unwrap();
    (index, token, ledger)
}

#[test]
fn same_claim_signed_by_different_members_is_indistinguishable() {
    let course = subject("course-101");
    let (index_0, token_0, ledger_0) = run_as(0);
    let (index_3, token_3, ledger_3) = run_as(3);

    assert_eq!(index_0, index_3);
    assert_eq!(token_0, token_3);
    assert_eq!(
        ledger_0.feedback_at(&course, index_0),
        ledger_3.feedback_at(&course, index_3)
    );
    assert_eq!(
        ledger_0.credential(&course, token_0),
        ledger_3.credential(&course, token_3)
    );
    assert_eq!(ledger_0.snapshot(), ledger_3.snapshot());
    assert_eq!(ledger_0.to_json().unwrap(), ledger_3.to_json().unwrap());
}

#[test]
fn rejection_messages_do_not_depend_on_the_signer() {
    let tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    let reject = |signer: usize, tamper: fn(&mut ClaimSubmission)| {
        let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
        ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();
        let mut sub = submission(&tree, course.clone(), 12, b"same words", signer);
        tamper(&mut sub);
        match ledger.add_feedback(&sub).unwrap_err() {
            LedgerError::Claim(err) => err,
            other => panic!("expected a claim error, got {other}"),
        }
    };

    let wrong_payload: fn(&mut ClaimSubmission) = |sub| sub.payload = b"other words".to_vec();
    let short_ring: fn(&mut ClaimSubmission) = |sub| {
        sub.signature.responses.pop();
    };
    for tamper in [wrong_payload, short_ring] {
        let from_0 = reject(0, tamper);
        let from_3 = reject(3, tamper);
        assert_eq!(from_0, from_3);
        assert_eq!(from_0.to_string(), from_3.to_string());
        assert!(!from_3.to_string().contains("signer"));
    }
    assert_eq!(reject(3, wrong_payload), ClaimError::BadSignature);
}

#[test]
fn snapshot_roundtrip_preserves_every_log() {
    let mut ledger = Ledger::new(LedgerConfig::new(owner())).unwrap();
    let tree = roster(Sha256FieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();
    ledger
        .add_feedback(&submission(&tree, course.clone(), 11, b"a", 0))
        .unwrap();
    ledger
        .issue_credential(&submission(&tree, course.clone(), 12, b"b", 1))
        .unwrap();

    let restored = Ledger::from_json(&ledger.to_json().unwrap()).unwrap();
    assert_eq!(restored.snapshot(), ledger.snapshot());
    assert_eq!(restored.current_block(), 3);
}

#[test]
fn stub_hash_ledger_runs_the_same_flow() {
    let mut ledger = Ledger::with_hasher(LedgerConfig::new(owner()), StubFieldHash).unwrap();
    let tree = roster(StubFieldHash);
    let course = subject("course-101");
    ledger.append_state(&owner(), &[course.clone()], &[tree.root()]).unwrap();
    assert_eq!(
        ledger
            .add_feedback(&submission(&tree, course, 14, b"stub", 0))
            .unwrap(),
        0
    );
}
