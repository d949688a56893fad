//! # Registry Errors
//!
//! [`ClaimError`] enumerates every way a gated submission can abort. Each
//! variant is raised before the registry commits anything, so an `Err`
//! always means no log grew and no token was minted.

use certgate_anchor::AnchorError;
use certgate_core::SubjectId;
use certgate_crypto::{RingError, SmtError};
use thiserror::Error;

/// Failure of the minting collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    /// The subject has no mint capacity left.
    #[error("supply of {cap} tokens for subject {subject} is exhausted")]
    SupplyExhausted {
        /// The credential subject.
        subject: SubjectId,
        /// Configured per-subject supply.
        cap: u64,
    },

    /// The minter refused the request.
    #[error("mint rejected: {0}")]
    Rejected(String),
}

/// Why a minter snapshot could not be restored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinterSnapshotError {
    /// A subject's token ids do not run `0..n`.
    #[error("token ids for subject {subject} are not sequential")]
    NonSequentialTokenIds {
        /// The credential subject.
        subject: SubjectId,
    },

    /// A subject holds more tokens than the snapshot's supply cap allows.
    #[error("subject {subject} holds {minted} tokens but the supply cap is {cap}")]
    SupplyCapExceeded {
        /// The credential subject.
        subject: SubjectId,
        /// Tokens recorded for the subject.
        minted: u64,
        /// Recorded per-subject supply.
        cap: u64,
    },
}

/// Why a gated submission was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// Nothing is anchored for the subject, so there is no root to prove
    /// against.
    #[error("no state anchored for subject {subject}")]
    NoAnchoredState {
        /// The submission subject.
        subject: SubjectId,
    },

    /// The inclusion proof has no siblings.
    #[error("sparse merkle tree proof is empty")]
    EmptyProof,

    /// The inclusion proof is malformed in some other way.
    #[error("malformed inclusion proof: {0}")]
    MalformedProof(SmtError),

    /// The proof does not lead to the subject's current root.
    #[error("wrong merkle tree verification for subject {subject}")]
    InclusionFailed {
        /// The submission subject.
        subject: SubjectId,
    },

    /// The ring signature is structurally malformed.
    #[error("malformed ring signature: {0}")]
    MalformedSignature(#[from] RingError),

    /// The ring signature does not verify over the payload.
    #[error("wrong signature")]
    BadSignature,

    /// Verification passed but the minting collaborator failed.
    #[error("mint failed: {0}")]
    MintFailed(#[from] MintError),

    /// The anchor failed for a reason other than an empty queue.
    #[error("anchor error: {0}")]
    Anchor(AnchorError),
}

impl From<SmtError> for ClaimError {
    fn from(err: SmtError) -> Self {
        match err {
            SmtError::EmptyProof => Self::EmptyProof,
            other => Self::MalformedProof(other),
        }
    }
}

impl From<AnchorError> for ClaimError {
    fn from(err: AnchorError) -> Self {
        match err {
            AnchorError::EmptyQueue { subject } => Self::NoAnchoredState { subject },
            other => Self::Anchor(other),
        }
    }
}

/// Errors from the [`Ledger`](crate::Ledger) facade.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// An anchoring call was refused.
    #[error(transparent)]
    Anchor(#[from] AnchorError),

    /// A gated submission was refused.
    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// The configuration is unusable.
    #[error("invalid ledger configuration: {0}")]
    InvalidConfig(String),

    /// YAML configuration could not be parsed.
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A snapshot violates a registry invariant.
    #[error("invalid ledger snapshot: {0}")]
    InvalidSnapshot(String),

    /// The credential part of a snapshot is inconsistent.
    #[error("invalid ledger snapshot: {0}")]
    MinterSnapshot(#[from] MinterSnapshotError),
}
