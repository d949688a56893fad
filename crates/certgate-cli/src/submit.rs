//! # Gated Submission Subcommands
//!
//! - `feedback`: Record feedback from a claim submission file.
//! - `issue`: Issue a credential from a claim submission file.
//!
//! The submission file is the JSON form of a
//! [`ClaimSubmission`](certgate_registry::ClaimSubmission). A rejected
//! submission leaves the state file untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use certgate_core::{PayloadDigest, SubjectId};
use certgate_registry::{ClaimSubmission, TokenId};

use crate::ledger_file::LedgerFile;
use crate::print_json;

/// Arguments shared by `certgate feedback` and `certgate issue`.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Path to the JSON claim submission.
    pub submission: PathBuf,
}

#[derive(Debug, Serialize)]
struct FeedbackOutput {
    subject: SubjectId,
    index: usize,
    digest: PayloadDigest,
}

#[derive(Debug, Serialize)]
struct IssueOutput {
    subject: SubjectId,
    token_id: TokenId,
    payload_digest: PayloadDigest,
}

fn read_submission(path: &Path) -> Result<ClaimSubmission> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid submission {}", path.display()))
}

/// Execute `certgate feedback`.
pub fn run_feedback(args: &SubmitArgs, file: &LedgerFile) -> Result<u8> {
    let submission = read_submission(&args.submission)?;
    let mut ledger = file.open_existing()?;
    let index = ledger.add_feedback(&submission)?;
    file.save(&ledger)?;

    print_json(&FeedbackOutput {
        digest: submission.payload_digest(),
        subject: submission.subject,
        index,
    })?;
    Ok(0)
}

/// Execute `certgate issue`.
pub fn run_issue(args: &SubmitArgs, file: &LedgerFile) -> Result<u8> {
    let submission = read_submission(&args.submission)?;
    let mut ledger = file.open_existing()?;
    let token_id = ledger.issue_credential(&submission)?;
    file.save(&ledger)?;

    print_json(&IssueOutput {
        payload_digest: submission.payload_digest(),
        subject: submission.subject,
        token_id,
    })?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use certgate_core::{ActorId, FieldElement};
    use certgate_crypto::testing::{sign_ring, RingKeyPair, SparseMerkleTree};
    use certgate_crypto::{RingPublicKey, Sha256FieldHash};
    use certgate_registry::Claim;

    /// Anchor a tree into a fresh state file and write a valid submission.
    fn setup(dir: &Path) -> (LedgerFile, PathBuf, ClaimSubmission) {
        let config = dir.join("ledger.yaml");
        std::fs::write(&config, "writer: owner\nsupply_cap: 1\n").unwrap();
        let file = LedgerFile::new(dir.join("state.json"), Some(config));

        let mut tree = SparseMerkleTree::new(Sha256FieldHash);
        tree.insert(FieldElement::from_u64(4), FieldElement::from_u64(40));
        tree.insert(FieldElement::from_u64(5), FieldElement::from_u64(50));
        let subject = SubjectId::from_label("course").unwrap();

        let mut ledger = file.open().unwrap();
        ledger
            .append_state(&ActorId::new("owner").unwrap(), &[subject.clone()], &[tree.root()])
            .unwrap();
        file.save(&ledger).unwrap();

        let keypairs: Vec<_> = (10u8..12).map(|i| RingKeyPair::from_seed(&[i])).collect();
        let ring: Vec<RingPublicKey> = keypairs.iter().map(|kp| *kp.public_key()).collect();
        let payload = b"ipfs://review".to_vec();
        let key = FieldElement::from_u64(5);
        let submission = ClaimSubmission {
            subject,
            claim: Claim::new(key, FieldElement::from_u64(50)),
            proof: tree.proof(&key).unwrap(),
            signature: sign_ring(&payload, &ring, 0, &keypairs[0]).unwrap(),
            payload,
            metadata_uri: None,
        };
        let path = dir.join("submission.json");
        std::fs::write(&path, serde_json::to_string(&submission).unwrap()).unwrap();
        (file, path, submission)
    }

    #[test]
    fn feedback_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let (file, path, submission) = setup(dir.path());

        assert_eq!(run_feedback(&SubmitArgs { submission: path }, &file).unwrap(), 0);

        let ledger = file.open().unwrap();
        assert_eq!(ledger.feedback_count(&submission.subject), 1);
        assert_eq!(
            ledger.feedback_at(&submission.subject, 0),
            Some(submission.payload_digest())
        );
    }

    #[test]
    fn rejected_feedback_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (file, path, mut submission) = setup(dir.path());
        submission.proof.clear();
        std::fs::write(&path, serde_json::to_string(&submission).unwrap()).unwrap();
        let before = std::fs::read_to_string(&file.state).unwrap();

        assert!(run_feedback(&SubmitArgs { submission: path }, &file).is_err());
        assert_eq!(std::fs::read_to_string(&file.state).unwrap(), before);
    }

    #[test]
    fn issue_respects_supply_cap() {
        let dir = tempfile::tempdir().unwrap();
        let (file, path, submission) = setup(dir.path());
        let args = SubmitArgs { submission: path };

        assert_eq!(run_issue(&args, &file).unwrap(), 0);
        let err = run_issue(&args, &file).unwrap_err();
        assert!(err.to_string().contains("supply"), "unexpected error: {err}");

        let ledger = file.open().unwrap();
        assert!(ledger.credential(&submission.subject, 0).is_some());
        assert!(ledger.credential(&submission.subject, 1).is_none());
    }

    #[test]
    fn submission_requires_existing_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submission.json");
        std::fs::write(&path, "{}").unwrap();
        let file = LedgerFile::new(dir.path().join("state.json"), None);
        assert!(run_feedback(&SubmitArgs { submission: path }, &file).is_err());
    }
}
