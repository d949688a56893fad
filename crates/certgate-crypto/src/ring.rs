//! # Ring Signature Verifier
//!
//! Verifies Abe–Ohkubo–Suzuki style ring signatures
//! over the prime-order subgroup of Baby Jubjub, the twisted Edwards curve
//! defined over the BN254 scalar field. Public-key coordinates are
//! therefore plain [`FieldElement`]s.
//!
//! ## Algorithm
//!
//! For a ring of `k` members with public keys `P_i`, the signature is
//! `(I, c[k], r[k], P[k])`. Verification walks the challenge cycle:
//!
//! ```text
//! e_0 = I
//! for i in 0..k:
//!     require c_i == e_i
//!     R_i     = G·r_i + P_i·c_i
//!     e_{i+1} = H(ring_digest, message, R_i)
//! valid iff e_k == I
//! ```
//!
//! `H` is SHA-256 over the domain tag, the ring digest, the length-prefixed
//! message and both coordinates of `R_i`, reduced into the field. Values
//! used as curve multipliers are reduced into the subgroup scalar field.
//!
//! ## Security Invariant
//!
//! - The verifier reports validity only. Nothing in the return value or
//!   the logs identifies which member signed.
//! - The ring digest binds every challenge to the ordered key set, so a
//!   signature cannot be replayed under a reordered or substituted ring.
//! - Responses must be canonical subgroup scalars; `r` and `r + ℓ` are not
//!   both accepted.
//! - Off-curve keys, keys outside the subgroup and the identity point make
//!   the signature invalid. Nothing here panics on untrusted input.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, Fr as CurveScalar};
use ark_ff::{BigInteger, PrimeField};
use certgate_core::FieldElement;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::RingError;

/// Domain tag for the per-member challenge hash.
const CHALLENGE_DOMAIN: &[u8] = b"certgate.ring.v1";

/// Domain tag for the ring digest.
const RING_DOMAIN: &[u8] = b"certgate.ring.keys.v1";

// ---------------------------------------------------------------------------
// Public keys
// ---------------------------------------------------------------------------

/// An affine Baby Jubjub point given by its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RingPublicKey {
    /// Affine x coordinate.
    pub x: FieldElement,
    /// Affine y coordinate.
    pub y: FieldElement,
}

impl RingPublicKey {
    /// Wrap raw coordinates. No curve check is performed here.
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    /// Capture the coordinates of an affine point.
    pub fn from_point(point: &EdwardsAffine) -> Self {
        Self {
            x: FieldElement::from_fr(point.x),
            y: FieldElement::from_fr(point.y),
        }
    }

    /// The curve point, if the coordinates name a non-identity point of
    /// the prime-order subgroup.
    pub fn to_point(&self) -> Option<EdwardsAffine> {
        if self.x.is_zero() && self.y == FieldElement::one() {
            return None;
        }
        let point = EdwardsAffine::new_unchecked(*self.x.as_fr(), *self.y.as_fr());
        if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
            return None;
        }
        Some(point)
    }

    /// Whether [`to_point`](Self::to_point) would accept this key.
    pub fn is_valid(&self) -> bool {
        self.to_point().is_some()
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A ring signature: index commitment plus per-member challenge/response
/// pairs and the ring itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSignature {
    /// The challenge the cycle must start from and close on.
    pub index_commitment: FieldElement,
    /// One challenge per ring member.
    pub challenges: Vec<FieldElement>,
    /// One response per ring member.
    pub responses: Vec<FieldElement>,
    /// The ring, in signing order.
    pub public_keys: Vec<RingPublicKey>,
}

impl RingSignature {
    /// Check the array shape and return the ring size.
    pub fn ring_size(&self) -> Result<usize, RingError> {
        let k = self.public_keys.len();
        if self.challenges.len() != k || self.responses.len() != k {
            return Err(RingError::LengthMismatch {
                challenges: self.challenges.len(),
                responses: self.responses.len(),
                public_keys: k,
            });
        }
        if k == 0 {
            return Err(RingError::EmptyRing);
        }
        Ok(k)
    }
}

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

/// SHA-256 over the ordered ring coordinates.
pub fn ring_digest(public_keys: &[RingPublicKey]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(RING_DOMAIN);
    hasher.update((public_keys.len() as u64).to_be_bytes());
    for key in public_keys {
        hasher.update(key.x.to_be_bytes());
        hasher.update(key.y.to_be_bytes());
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Challenge `H(ring_digest, message, R)`.
pub(crate) fn challenge(
    ring_digest: &[u8; 32],
    message: &[u8],
    commitment: &EdwardsAffine,
) -> FieldElement {
    let mut hasher = Sha256::new();
    hasher.update(CHALLENGE_DOMAIN);
    hasher.update(ring_digest);
    hasher.update((message.len() as u64).to_be_bytes());
    hasher.update(message);
    hasher.update(FieldElement::from_fr(commitment.x).to_be_bytes());
    hasher.update(FieldElement::from_fr(commitment.y).to_be_bytes());
    FieldElement::from_be_bytes_mod_order(&hasher.finalize())
}

/// Reduce a field element into the subgroup scalar field.
pub(crate) fn to_scalar(value: &FieldElement) -> CurveScalar {
    CurveScalar::from_le_bytes_mod_order(&value.to_le_bytes())
}

/// Embed a subgroup scalar as a field element. The subgroup order is
/// smaller than the field prime, so this never reduces.
pub(crate) fn from_scalar(scalar: &CurveScalar) -> FieldElement {
    FieldElement::from_le_bytes_mod_order(&scalar.into_bigint().to_bytes_le())
}

/// `G·r + P·c` in affine form.
pub(crate) fn commitment(
    response: &CurveScalar,
    public_key: &EdwardsAffine,
    challenge: &CurveScalar,
) -> EdwardsAffine {
    let generator = EdwardsAffine::generator();
    (generator * *response + *public_key * *challenge).into_affine()
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Stateless ring signature verifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingVerifier;

impl RingVerifier {
    /// Create a verifier.
    pub fn new() -> Self {
        Self
    }

    /// Verify `signature` over `message`.
    ///
    /// Returns an error only for a structurally malformed signature (empty
    /// ring, mismatched array lengths). Every other failure is `Ok(false)`.
    pub fn verify(&self, message: &[u8], signature: &RingSignature) -> Result<bool, RingError> {
        let k = signature.ring_size()?;

        let mut points = Vec::with_capacity(k);
        for key in &signature.public_keys {
            match key.to_point() {
                Some(point) => points.push(point),
                None => {
                    debug!(ring_size = k, "ring contains an invalid public key");
                    return Ok(false);
                }
            }
        }

        let digest = ring_digest(&signature.public_keys);
        let mut expected = signature.index_commitment;
        for (i, point) in points.iter().enumerate() {
            if signature.challenges[i] != expected {
                debug!(ring_size = k, "ring challenge cycle broken");
                return Ok(false);
            }
            let response = to_scalar(&signature.responses[i]);
            if from_scalar(&response) != signature.responses[i] {
                debug!(ring_size = k, "ring response is not a canonical scalar");
                return Ok(false);
            }
            let c = to_scalar(&signature.challenges[i]);
            expected = challenge(&digest, message, &commitment(&response, point, &c));
        }

        let closed = expected == signature.index_commitment;
        debug!(ring_size = k, closed, "ring signature checked");
        Ok(closed)
    }
}
