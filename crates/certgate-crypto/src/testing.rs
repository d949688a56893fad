//! # Test Support Builders
//!
//! Producers for the artefacts the verifiers consume. These exist so the
//! verifiers, the gate and the binaries can be exercised end to end; they
//! are compiled only for this crate's tests or with the `testing` feature.
//!
//! - [`SparseMerkleTree`]: in-memory tree emitting leaf-first sibling
//!   paths in the verifier's layout. A tree holding a single leaf has an
//!   empty path for it, which the verifier rejects, so provable trees
//!   need at least two leaves.
//! - [`RingKeyPair`] and [`sign_ring`]: deterministic ring signer.
//! - [`StubFieldHash`]: linear, insecure hash with hand-computable output.

use std::collections::BTreeMap;
use std::fmt;

use ark_bn254::Fr;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, Fr as CurveScalar};
use ark_ff::{BigInteger, One, PrimeField, Zero};
use certgate_core::FieldElement;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::RingError;
use crate::field_hash::FieldHash;
use crate::ring::{challenge, commitment, from_scalar, ring_digest, to_scalar};
use crate::ring::{RingPublicKey, RingSignature};
use crate::smt::{leaf_hash, node_hash};

// ---------------------------------------------------------------------------
// Stub hash
// ---------------------------------------------------------------------------

/// `hash2(l, r) = l + 2r`, `hash3(a, b, c) = a + 2b + 3c` over the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StubFieldHash;

impl FieldHash for StubFieldHash {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement::from_fr(*a.as_fr() + Fr::from(2u64) * b.as_fr())
    }

    fn hash3(&self, a: &FieldElement, b: &FieldElement, c: &FieldElement) -> FieldElement {
        FieldElement::from_fr(
            *a.as_fr() + Fr::from(2u64) * b.as_fr() + Fr::from(3u64) * c.as_fr(),
        )
    }
}

// ---------------------------------------------------------------------------
// Sparse Merkle tree
// ---------------------------------------------------------------------------

/// In-memory sparse Merkle tree.
///
/// Leaves sit at the shallowest depth that separates their key from every
/// other key; an empty subtree hashes to zero.
#[derive(Debug, Clone)]
pub struct SparseMerkleTree<H> {
    hasher: H,
    leaves: BTreeMap<FieldElement, FieldElement>,
}

impl<H: FieldHash> SparseMerkleTree<H> {
    /// Create an empty tree.
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            leaves: BTreeMap::new(),
        }
    }

    /// Insert or overwrite a leaf, returning the previous value.
    pub fn insert(&mut self, key: FieldElement, value: FieldElement) -> Option<FieldElement> {
        self.leaves.insert(key, value)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &FieldElement) -> Option<&FieldElement> {
        self.leaves.get(key)
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Current root. The empty tree has root zero.
    pub fn root(&self) -> FieldElement {
        let entries: Vec<(FieldElement, FieldElement)> =
            self.leaves.iter().map(|(k, v)| (*k, *v)).collect();
        self.subtree_root(&entries, 0)
    }

    /// Leaf-first sibling path for `key`, or `None` if it is absent.
    pub fn proof(&self, key: &FieldElement) -> Option<Vec<FieldElement>> {
        if !self.leaves.contains_key(key) {
            return None;
        }
        let mut entries: Vec<(FieldElement, FieldElement)> =
            self.leaves.iter().map(|(k, v)| (*k, *v)).collect();
        let mut root_first = Vec::new();
        let mut depth = 0;
        while entries.len() > 1 {
            let (ones, zeros): (Vec<_>, Vec<_>) =
                entries.into_iter().partition(|(k, _)| k.bit(depth));
            if key.bit(depth) {
                root_first.push(self.subtree_root(&zeros, depth + 1));
                entries = ones;
            } else {
                root_first.push(self.subtree_root(&ones, depth + 1));
                entries = zeros;
            }
            depth += 1;
        }
        root_first.reverse();
        Some(root_first)
    }

    fn subtree_root(&self, entries: &[(FieldElement, FieldElement)], depth: usize) -> FieldElement {
        match entries {
            [] => FieldElement::zero(),
            [(key, value)] => leaf_hash(&self.hasher, key, value),
            _ => {
                let (ones, zeros): (Vec<_>, Vec<_>) =
                    entries.iter().copied().partition(|(k, _)| k.bit(depth));
                let left = self.subtree_root(&zeros, depth + 1);
                let right = self.subtree_root(&ones, depth + 1);
                node_hash(&self.hasher, &left, &right)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Ring signer
// ---------------------------------------------------------------------------

/// A Baby Jubjub key pair. The secret scalar is never printed.
#[derive(Clone)]
pub struct RingKeyPair {
    secret: CurveScalar,
    public: RingPublicKey,
}

impl RingKeyPair {
    /// Derive a key pair deterministically from seed bytes.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut secret = derive_scalar(b"certgate.ring.keygen", &[seed]);
        if secret.is_zero() {
            secret = CurveScalar::one();
        }
        let point = (EdwardsAffine::generator() * secret).into_affine();
        Self {
            secret,
            public: RingPublicKey::from_point(&point),
        }
    }

    /// Draw a fresh key pair from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; 64];
        rng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// The public key.
    pub fn public_key(&self) -> &RingPublicKey {
        &self.public
    }
}

impl fmt::Debug for RingKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingKeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Sign `message` as member `signer_index` of `ring`.
///
/// Deterministic: nonces are derived from the secret, the ring and the
/// message, so equal inputs give equal signatures.
pub fn sign_ring(
    message: &[u8],
    ring: &[RingPublicKey],
    signer_index: usize,
    keypair: &RingKeyPair,
) -> Result<RingSignature, RingError> {
    let k = ring.len();
    if k == 0 {
        return Err(RingError::EmptyRing);
    }
    if ring.get(signer_index) != Some(&keypair.public) {
        return Err(RingError::SignerNotInRing);
    }
    let points = ring
        .iter()
        .enumerate()
        .map(|(index, key)| key.to_point().ok_or(RingError::InvalidPublicKey { index }))
        .collect::<Result<Vec<_>, _>>()?;

    let digest = ring_digest(ring);
    let secret_bytes = keypair.secret.into_bigint().to_bytes_le();
    let alpha = derive_scalar(b"certgate.ring.nonce", &[&secret_bytes, &digest, message]);

    let mut challenges = vec![FieldElement::zero(); k];
    let mut responses = vec![FieldElement::zero(); k];

    let opening = (EdwardsAffine::generator() * alpha).into_affine();
    challenges[(signer_index + 1) % k] = challenge(&digest, message, &opening);

    for step in 1..k {
        let i = (signer_index + step) % k;
        let decoy = derive_scalar(
            b"certgate.ring.decoy",
            &[&secret_bytes, &digest, message, &(i as u64).to_be_bytes()],
        );
        responses[i] = from_scalar(&decoy);
        let c = to_scalar(&challenges[i]);
        challenges[(i + 1) % k] = challenge(&digest, message, &commitment(&decoy, &points[i], &c));
    }

    let c_signer = to_scalar(&challenges[signer_index]);
    responses[signer_index] = from_scalar(&(alpha - c_signer * keypair.secret));

    Ok(RingSignature {
        index_commitment: challenges[0],
        challenges,
        responses,
        public_keys: ring.to_vec(),
    })
}

/// 512 bits of labelled SHA-256 output reduced into the scalar field.
fn derive_scalar(label: &[u8], parts: &[&[u8]]) -> CurveScalar {
    let mut wide = Vec::with_capacity(64);
    for counter in 0u8..2 {
        let mut hasher = Sha256::new();
        hasher.update(label);
        hasher.update([counter]);
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        wide.extend_from_slice(&hasher.finalize());
    }
    CurveScalar::from_le_bytes_mod_order(&wide)
}
