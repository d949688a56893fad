//! # Verification Errors
//!
//! Protocol errors raised by the verifiers. A well-formed input that
//! simply fails to verify is never an error: both verifiers report it as
//! `Ok(false)`.

use thiserror::Error;

/// Malformed sparse Merkle tree proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmtError {
    /// The sibling path is empty.
    #[error("sparse merkle tree proof is empty")]
    EmptyProof,

    /// The sibling path is longer than the key has bits.
    #[error("sparse merkle tree proof has {depth} siblings, at most {max} are allowed")]
    ProofTooDeep {
        /// Supplied proof length.
        depth: usize,
        /// Maximum tree depth.
        max: usize,
    },
}

/// Malformed ring signature, or a signing request that cannot be honoured.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    /// The ring has no members.
    #[error("ring signature has an empty ring")]
    EmptyRing,

    /// The challenge, response and public-key arrays differ in length.
    #[error(
        "ring signature arrays differ in length: {challenges} challenges, \
         {responses} responses, {public_keys} public keys"
    )]
    LengthMismatch {
        /// Number of challenges.
        challenges: usize,
        /// Number of responses.
        responses: usize,
        /// Number of public keys.
        public_keys: usize,
    },

    /// A ring member's key is not a valid subgroup point (signing only).
    #[error("ring member {index} is not a valid public key")]
    InvalidPublicKey {
        /// Position of the offending key.
        index: usize,
    },

    /// The signing key does not sit at the claimed ring position.
    #[error("signer is not a member of the ring at the given position")]
    SignerNotInRing,
}
