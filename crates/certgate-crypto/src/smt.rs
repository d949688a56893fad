//! # Sparse Merkle Tree Inclusion Verifier
//!
//! Recomputes a sparse Merkle tree root from a claimed `(key, value)` leaf
//! and its sibling path, then compares it with an anchored root.
//!
//! ## Algorithm
//!
//! - Leaf: `h = hash3(key, value, 1)`. The constant `1` marks the terminal
//!   level; it is the only level that uses the three-input hash.
//! - Path: for a proof of length `d`, sibling `proof[i]` sits at tree
//!   level `l = d - 1 - i` (the root is level 0). Bit `l` of the key,
//!   least-significant first, picks the side:
//!   bit 1 → `h = hash2(sibling, h)`, bit 0 → `h = hash2(h, sibling)`.
//! - Empty subtrees hash to zero, so a zero sibling is a legal path entry.
//!
//! `proof[0]` is the sibling adjacent to the leaf and the last entry is
//! adjacent to the root. The proof length is the depth at which the leaf
//! actually sits, not a fixed tree height.
//!
//! ## Security Invariant
//!
//! An empty proof is a protocol error ([`SmtError::EmptyProof`]), never a
//! negative inclusion result. A proof longer than the key width is also
//! rejected, since key bits beyond it would all read as zero and admit
//! arbitrarily padded paths.

use certgate_core::{FieldElement, FIELD_BITS};
use tracing::debug;

use crate::error::SmtError;
use crate::field_hash::FieldHash;

/// Marker mixed into the terminal leaf hash.
pub const LEAF_MARKER: u64 = 1;

/// Maximum number of siblings: one per key bit.
pub const MAX_PROOF_DEPTH: usize = FIELD_BITS;

/// Hash of a terminal leaf.
pub fn leaf_hash<H: FieldHash + ?Sized>(
    hasher: &H,
    key: &FieldElement,
    value: &FieldElement,
) -> FieldElement {
    hasher.hash3(key, value, &FieldElement::from_u64(LEAF_MARKER))
}

/// Hash of an interior node from its ordered children.
pub fn node_hash<H: FieldHash + ?Sized>(
    hasher: &H,
    left: &FieldElement,
    right: &FieldElement,
) -> FieldElement {
    hasher.hash2(left, right)
}

/// Inclusion verifier bound to one hash strategy.
#[derive(Debug, Clone, Default)]
pub struct SmtVerifier<H> {
    hasher: H,
}

impl<H: FieldHash> SmtVerifier<H> {
    /// Create a verifier over `hasher`.
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// The injected hash strategy.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Fold the sibling path from the leaf up and return the implied root.
    pub fn compute_root(
        &self,
        key: &FieldElement,
        value: &FieldElement,
        proof: &[FieldElement],
    ) -> Result<FieldElement, SmtError> {
        let depth = proof.len();
        if depth == 0 {
            return Err(SmtError::EmptyProof);
        }
        if depth > MAX_PROOF_DEPTH {
            return Err(SmtError::ProofTooDeep {
                depth,
                max: MAX_PROOF_DEPTH,
            });
        }

        let mut node = leaf_hash(&self.hasher, key, value);
        for (i, sibling) in proof.iter().enumerate() {
            let level = depth - 1 - i;
            node = if key.bit(level) {
                node_hash(&self.hasher, sibling, &node)
            } else {
                node_hash(&self.hasher, &node, sibling)
            };
        }
        Ok(node)
    }

    /// Check that `(key, value)` is included under `root`.
    ///
    /// Returns `Ok(false)` for a well-formed proof that does not lead to
    /// `root`.
    pub fn verify(
        &self,
        root: &FieldElement,
        key: &FieldElement,
        value: &FieldElement,
        proof: &[FieldElement],
    ) -> Result<bool, SmtError> {
        let computed = self.compute_root(key, value, proof)?;
        let included = computed == *root;
        debug!(depth = proof.len(), included, "smt inclusion checked");
        Ok(included)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_hash::Sha256FieldHash;
    use crate::testing::{SparseMerkleTree, StubFieldHash};
    use proptest::prelude::*;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    // -----------------------------------------------------------------------
    // Layout vectors
    // -----------------------------------------------------------------------

    #[test]
    fn test_stub_golden_vector_fixes_layout() {
        // Stub: hash2(l, r) = l + 2r, hash3(a, b, c) = a + 2b + 3c.
        // key = 1, value = 5 → leaf = 1 + 10 + 3 = 14.
        // proof = [7, 11], depth 2:
        //   i = 0, level 1, bit 0 → hash2(14, 7) = 28
        //   i = 1, level 0, bit 1 → hash2(11, 28) = 67
        let verifier = SmtVerifier::new(StubFieldHash);
        let root = verifier.compute_root(&fe(1), &fe(5), &[fe(7), fe(11)]).unwrap();
        assert_eq!(root, fe(67));
        assert!(verifier.verify(&fe(67), &fe(1), &fe(5), &[fe(7), fe(11)]).unwrap());
    }

    #[test]
    fn test_two_leaf_tree_by_hand() {
        let h = Sha256FieldHash;
        let leaf1 = leaf_hash(&h, &fe(1), &fe(10));
        let leaf2 = leaf_hash(&h, &fe(2), &fe(20));
        // Keys split on bit 0: key 2 goes left, key 1 goes right.
        let root = node_hash(&h, &leaf2, &leaf1);

        let verifier = SmtVerifier::new(h);
        assert!(verifier.verify(&root, &fe(1), &fe(10), &[leaf2]).unwrap());
        assert!(verifier.verify(&root, &fe(2), &fe(20), &[leaf1]).unwrap());
        assert!(!verifier.verify(&root, &fe(1), &fe(11), &[leaf2]).unwrap());
    }

    #[test]
    fn test_zero_sibling_is_empty_subtree() {
        let h = Sha256FieldHash;
        let leaf = leaf_hash(&h, &fe(4), &fe(9));
        // key 4 = 0b100: bit 0 is 0, so the leaf is the left child.
        let root = node_hash(&h, &leaf, &FieldElement::zero());
        let verifier = SmtVerifier::new(h);
        assert!(verifier
            .verify(&root, &fe(4), &fe(9), &[FieldElement::zero()])
            .unwrap());
    }

    // -----------------------------------------------------------------------
    // Protocol errors
    // -----------------------------------------------------------------------

    #[test]
    fn test_empty_proof_is_error() {
        let verifier = SmtVerifier::new(Sha256FieldHash);
        assert_eq!(
            verifier.verify(&fe(0), &fe(1), &fe(2), &[]),
            Err(SmtError::EmptyProof)
        );
    }

    #[test]
    fn test_too_deep_proof_is_error() {
        let verifier = SmtVerifier::new(StubFieldHash);
        let proof = vec![FieldElement::zero(); MAX_PROOF_DEPTH + 1];
        assert_eq!(
            verifier.verify(&fe(0), &fe(1), &fe(2), &proof),
            Err(SmtError::ProofTooDeep {
                depth: MAX_PROOF_DEPTH + 1,
                max: MAX_PROOF_DEPTH
            })
        );
        let full = vec![FieldElement::zero(); MAX_PROOF_DEPTH];
        assert!(verifier.verify(&fe(0), &fe(1), &fe(2), &full).is_ok());
    }

    // -----------------------------------------------------------------------
    // Builder round trips
    // -----------------------------------------------------------------------

    #[test]
    fn test_every_key_of_built_tree_verifies() {
        let mut tree = SparseMerkleTree::new(Sha256FieldHash);
        for k in 1..=20u64 {
            tree.insert(fe(k), fe(k * 100));
        }
        let root = tree.root();
        let verifier = SmtVerifier::new(Sha256FieldHash);
        for k in 1..=20u64 {
            let proof = tree.proof(&fe(k)).unwrap();
            assert!(verifier.verify(&root, &fe(k), &fe(k * 100), &proof).unwrap());
            assert!(!verifier.verify(&root, &fe(k), &fe(k * 100 + 1), &proof).unwrap());
        }
    }

    #[test]
    fn test_proof_against_stale_root_fails() {
        let mut tree = SparseMerkleTree::new(Sha256FieldHash);
        tree.insert(fe(1), fe(1));
        tree.insert(fe(2), fe(2));
        let stale = tree.root();
        tree.insert(fe(3), fe(3));
        let proof = tree.proof(&fe(3)).unwrap();
        let verifier = SmtVerifier::new(Sha256FieldHash);
        assert!(!verifier.verify(&stale, &fe(3), &fe(3), &proof).unwrap());
        assert!(verifier.verify(&tree.root(), &fe(3), &fe(3), &proof).unwrap());
    }

    proptest! {
        #[test]
        fn prop_sibling_bit_flip_rejects(
            keys in proptest::collection::btree_set(any::<u64>(), 2..16),
            pick in any::<prop::sample::Index>(),
            sibling in any::<prop::sample::Index>(),
            bit in 0usize..250,
        ) {
            let keys: Vec<u64> = keys.into_iter().collect();
            let mut tree = SparseMerkleTree::new(Sha256FieldHash);
            for k in &keys {
                tree.insert(fe(*k), fe(k.wrapping_mul(7)));
            }
            let key = keys[pick.index(keys.len())];
            let mut proof = tree.proof(&fe(key)).unwrap();
            let verifier = SmtVerifier::new(Sha256FieldHash);
            let root = tree.root();
            prop_assert!(verifier.verify(&root, &fe(key), &fe(key.wrapping_mul(7)), &proof).unwrap());

            let at = sibling.index(proof.len());
            let mut bytes = proof[at].to_le_bytes();
            bytes[bit / 8] ^= 1 << (bit % 8);
            proof[at] = FieldElement::from_le_bytes_mod_order(&bytes);
            prop_assert!(!verifier.verify(&root, &fe(key), &fe(key.wrapping_mul(7)), &proof).unwrap());
        }

        #[test]
        fn prop_verify_never_panics(
            root in any::<[u8; 32]>(),
            key in any::<[u8; 32]>(),
            value in any::<[u8; 32]>(),
            proof in proptest::collection::vec(any::<[u8; 32]>(), 0..8),
        ) {
            let verifier = SmtVerifier::new(Sha256FieldHash);
            let proof: Vec<FieldElement> = proof
                .iter()
                .map(|b| FieldElement::from_be_bytes_mod_order(b))
                .collect();
            let _ = verifier.verify(
                &FieldElement::from_be_bytes_mod_order(&root),
                &FieldElement::from_be_bytes_mod_order(&key),
                &FieldElement::from_be_bytes_mod_order(&value),
                &proof,
            );
        }
    }
}
