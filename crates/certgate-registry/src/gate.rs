//! # Claim Gate
//!
//! The verification pipeline shared by every gated registry:
//!
//! 1. Fetch the subject's current root from the anchor.
//! 2. Verify inclusion of the claimed leaf under that root.
//! 3. Verify the ring signature over the submitted payload.
//!
//! The gate itself never mutates anything. Registries call
//! [`ClaimGate::verify`] and commit their side effect only on `Ok`.
//!
//! ## Security Invariant
//!
//! The steps run in the order above and the first failure aborts. The
//! root is always the newest anchored entry; proofs against evicted or
//! superseded roots fail step 2.

use certgate_anchor::RootSource;
use certgate_core::PayloadDigest;
use certgate_crypto::{FieldHash, RingVerifier, SmtVerifier};
use tracing::debug;

use crate::claim::ClaimSubmission;
use crate::error::ClaimError;

/// Inclusion-plus-signature gate over one hash strategy.
#[derive(Debug, Clone, Default)]
pub struct ClaimGate<H> {
    smt: SmtVerifier<H>,
    ring: RingVerifier,
}

impl<H: FieldHash> ClaimGate<H> {
    /// Create a gate over `hasher`.
    pub fn new(hasher: H) -> Self {
        Self {
            smt: SmtVerifier::new(hasher),
            ring: RingVerifier::new(),
        }
    }

    /// The inclusion verifier.
    pub fn smt(&self) -> &SmtVerifier<H> {
        &self.smt
    }

    /// Run all three checks and return the digest of the accepted payload.
    pub fn verify<R: RootSource + ?Sized>(
        &self,
        anchor: &R,
        submission: &ClaimSubmission,
    ) -> Result<PayloadDigest, ClaimError> {
        let subject = &submission.subject;
        let root = anchor.last_root(subject)?;

        let claim = &submission.claim;
        if !self
            .smt
            .verify(&root, &claim.key, &claim.value, &submission.proof)?
        {
            debug!(subject = %subject, "claim not included under current root");
            return Err(ClaimError::InclusionFailed {
                subject: subject.clone(),
            });
        }

        if !self.ring.verify(&submission.payload, &submission.signature)? {
            debug!(subject = %subject, "ring signature rejected");
            return Err(ClaimError::BadSignature);
        }

        Ok(submission.payload_digest())
    }
}
