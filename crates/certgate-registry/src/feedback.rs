//! # Feedback Registry
//!
//! Per-subject append-only log of accepted feedback payload digests.
//! A payload is recorded only after the [`ClaimGate`] accepts the
//! submission; its position in the log is its index, starting at zero.

use std::collections::{BTreeMap, HashMap};

use certgate_anchor::RootSource;
use certgate_core::{PayloadDigest, SubjectId};
use certgate_crypto::FieldHash;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::claim::ClaimSubmission;
use crate::error::ClaimError;
use crate::gate::ClaimGate;

/// Serialisable image of every feedback log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSnapshot {
    /// Logs keyed by subject, in insertion order.
    pub logs: BTreeMap<SubjectId, Vec<PayloadDigest>>,
}

/// Gated feedback log.
#[derive(Debug, Clone)]
pub struct FeedbackRegistry<H> {
    gate: ClaimGate<H>,
    logs: HashMap<SubjectId, Vec<PayloadDigest>>,
}

impl<H: FieldHash> FeedbackRegistry<H> {
    /// Create an empty registry gated over `hasher`.
    pub fn new(hasher: H) -> Self {
        Self {
            gate: ClaimGate::new(hasher),
            logs: HashMap::new(),
        }
    }

    /// Rebuild from a snapshot.
    pub fn restore(hasher: H, snapshot: FeedbackSnapshot) -> Self {
        Self {
            gate: ClaimGate::new(hasher),
            logs: snapshot.logs.into_iter().collect(),
        }
    }

    /// Capture every log.
    pub fn snapshot(&self) -> FeedbackSnapshot {
        FeedbackSnapshot {
            logs: self
                .logs
                .iter()
                .map(|(subject, log)| (subject.clone(), log.clone()))
                .collect(),
        }
    }

    /// Verify `submission` against `anchor` and append its payload digest
    /// to the subject's log. Returns the new entry's index.
    pub fn add_feedback<R: RootSource + ?Sized>(
        &mut self,
        anchor: &R,
        submission: &ClaimSubmission,
    ) -> Result<usize, ClaimError> {
        let digest = self.gate.verify(anchor, submission)?;
        let log = self.logs.entry(submission.subject.clone()).or_default();
        log.push(digest);
        let index = log.len() - 1;
        info!(subject = %submission.subject, index, digest = %digest, "feedback recorded");
        Ok(index)
    }

    /// Digest at `index` of the subject's log.
    pub fn feedback_at(&self, subject: &SubjectId, index: usize) -> Option<PayloadDigest> {
        self.logs.get(subject)?.get(index).copied()
    }

    /// Length of the subject's log.
    pub fn feedback_count(&self, subject: &SubjectId) -> usize {
        self.logs.get(subject).map_or(0, Vec::len)
    }

    /// Up to `limit` digests starting at `offset`. Out-of-range windows
    /// are clamped, never an error.
    pub fn feedbacks(&self, subject: &SubjectId, offset: usize, limit: usize) -> Vec<PayloadDigest> {
        self.logs
            .get(subject)
            .map(|log| log.iter().skip(offset).take(limit).copied().collect())
            .unwrap_or_default()
    }

    /// The gate submissions pass through.
    pub fn gate(&self) -> &ClaimGate<H> {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use certgate_anchor::{AnchorConfig, ManualClock, SingleWriter, StateAnchor};
    use certgate_core::{ActorId, FieldElement};
    use certgate_crypto::testing::{sign_ring, RingKeyPair, SparseMerkleTree};
    use certgate_crypto::Sha256FieldHash;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    fn course() -> SubjectId {
        SubjectId::from_hex("0x736f6d65636f757273656e616d65").unwrap()
    }

    fn setup() -> (
        StateAnchor<ManualClock, SingleWriter>,
        SparseMerkleTree<Sha256FieldHash>,
        RingKeyPair,
    ) {
        let owner = ActorId::new("owner").unwrap();
        let mut anchor = StateAnchor::new(
            AnchorConfig::default(),
            ManualClock::new(1),
            SingleWriter::new(owner.clone()),
        )
        .unwrap();
        let mut tree = SparseMerkleTree::new(Sha256FieldHash);
        tree.insert(fe(10), fe(7));
        tree.insert(fe(11), fe(8));
        anchor.append_state(&owner, &[course()], &[tree.root()]).unwrap();
        (anchor, tree, RingKeyPair::from_seed(b"student"))
    }

    fn submission(
        tree: &SparseMerkleTree<Sha256FieldHash>,
        key: &RingKeyPair,
        payload: &[u8],
    ) -> ClaimSubmission {
        ClaimSubmission {
            subject: course(),
            claim: Claim::new(fe(10), fe(7)),
            proof: tree.proof(&fe(10)).unwrap(),
            signature: sign_ring(payload, &[*key.public_key()], 0, key).unwrap(),
            payload: payload.to_vec(),
            metadata_uri: None,
        }
    }

    #[test]
    fn first_feedback_gets_index_zero() {
        let (anchor, tree, key) = setup();
        let mut registry = FeedbackRegistry::new(Sha256FieldHash);
        let sub = submission(&tree, &key, b"ipfs-1");
        assert_eq!(registry.add_feedback(&anchor, &sub).unwrap(), 0);
        assert_eq!(registry.feedback_at(&course(), 0), Some(PayloadDigest::of(b"ipfs-1")));
        assert_eq!(registry.feedback_count(&course()), 1);
    }

    #[test]
    fn indices_are_sequential() {
        let (anchor, tree, key) = setup();
        let mut registry = FeedbackRegistry::new(Sha256FieldHash);
        for i in 0..4 {
            let payload = format!("ipfs-{i}");
            let sub = submission(&tree, &key, payload.as_bytes());
            assert_eq!(registry.add_feedback(&anchor, &sub).unwrap(), i);
        }
        assert_eq!(registry.feedback_count(&course()), 4);
    }

    #[test]
    fn rejected_feedback_leaves_log_unchanged() {
        let (anchor, tree, key) = setup();
        let mut registry = FeedbackRegistry::new(Sha256FieldHash);
        let mut sub = submission(&tree, &key, b"ipfs-1");
        sub.proof.clear();
        assert_eq!(registry.add_feedback(&anchor, &sub), Err(ClaimError::EmptyProof));
        assert_eq!(registry.feedback_count(&course()), 0);
        assert_eq!(registry.feedback_at(&course(), 0), None);
    }

    #[test]
    fn pagination_clamps() {
        let (anchor, tree, key) = setup();
        let mut registry = FeedbackRegistry::new(Sha256FieldHash);
        registry
            .add_feedback(&anchor, &submission(&tree, &key, b"ipfs-1"))
            .unwrap();
        assert_eq!(
            registry.feedbacks(&course(), 0, 3),
            vec![PayloadDigest::of(b"ipfs-1")]
        );
        assert!(registry.feedbacks(&course(), 5, 3).is_empty());
        assert!(registry.feedbacks(&course(), 0, 0).is_empty());
        assert!(registry
            .feedbacks(&SubjectId::from_label("none").unwrap(), 0, 10)
            .is_empty());
    }

    #[test]
    fn snapshot_roundtrip() {
        let (anchor, tree, key) = setup();
        let mut registry = FeedbackRegistry::new(Sha256FieldHash);
        registry
            .add_feedback(&anchor, &submission(&tree, &key, b"ipfs-1"))
            .unwrap();
        let json = serde_json::to_string(&registry.snapshot()).unwrap();
        let snapshot: FeedbackSnapshot = serde_json::from_str(&json).unwrap();
        let restored = FeedbackRegistry::restore(Sha256FieldHash, snapshot);
        assert_eq!(restored.feedbacks(&course(), 0, 10), registry.feedbacks(&course(), 0, 10));
    }
}
