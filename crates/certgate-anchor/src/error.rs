//! # Anchor Errors
//!
//! Every rejection is raised before the anchor is touched, so an `Err`
//! from a mutating call always means no queue changed.

use certgate_core::{ActorId, BlockNumber, SubjectId};
use thiserror::Error;

/// Errors from [`StateAnchor`](crate::StateAnchor) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnchorError {
    /// The caller is not the privileged writer.
    #[error("{caller} is not authorized to anchor state")]
    NotAuthorized {
        /// The rejected caller.
        caller: ActorId,
    },

    /// The subject and root batches have different lengths.
    #[error("subjects and roots must be the same size ({subjects} subjects, {roots} roots)")]
    LengthMismatch {
        /// Number of subjects supplied.
        subjects: usize,
        /// Number of roots supplied.
        roots: usize,
    },

    /// Nothing has been anchored for the subject.
    #[error("no state anchored for subject {subject}")]
    EmptyQueue {
        /// The queried subject.
        subject: SubjectId,
    },

    /// The clock reads earlier than the newest entry of a touched queue.
    #[error("block clock regressed for subject {subject}: newest entry at {newest}, clock at {current}")]
    ClockRegression {
        /// The subject whose ordering would break.
        subject: SubjectId,
        /// Block of the subject's newest entry.
        newest: BlockNumber,
        /// Current clock reading.
        current: BlockNumber,
    },

    /// Queue capacity must be at least one.
    #[error("queue capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// A snapshot violates a queue invariant.
    #[error("invalid anchor snapshot: {0}")]
    InvalidSnapshot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_message() {
        let err = AnchorError::LengthMismatch {
            subjects: 1,
            roots: 2,
        };
        assert_eq!(
            err.to_string(),
            "subjects and roots must be the same size (1 subjects, 2 roots)"
        );
    }

    #[test]
    fn not_authorized_names_caller() {
        let err = AnchorError::NotAuthorized {
            caller: ActorId::new("mallory").unwrap(),
        };
        assert!(err.to_string().contains("actor:mallory"));
    }
}
