//! # Proof Types
//!
//! Inclusion proofs for the identity tree and membership/non-membership
//! proofs for sparse trees, together with the recomputation the circuit
//! performs on them.

use serde::{Deserialize, Serialize};

use zkpp_core::{CryptoError, FieldElement, TreeError};
use zkpp_crypto::poseidon::{hash, hash_pair};

// ---------------------------------------------------------------------------
// Incremental tree inclusion proof
// ---------------------------------------------------------------------------

/// Inclusion proof from a lean incremental tree, in circuit layout.
///
/// `siblings` and `path` always have the circuit's maximum depth. Only the
/// first `depth` entries are meaningful; the rest are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The proven leaf.
    pub leaf: FieldElement,
    /// Path bits of the levels that had a sibling, packed with the bottom
    /// level as bit 0.
    pub index: u64,
    /// Sibling per level, bottom-up, zero-padded.
    pub siblings: Vec<FieldElement>,
    /// Path bit per level (1 = the node is the right child), zero-padded.
    pub path: Vec<u8>,
    /// Number of levels actually used.
    pub depth: usize,
}

impl MerkleProof {
    /// Recompute the root by hashing the leaf through the first `depth`
    /// siblings.
    pub fn compute_root(&self) -> Result<FieldElement, TreeError> {
        if self.depth > self.siblings.len() || self.depth > self.path.len() {
            return Err(TreeError::DepthExceeded {
                depth: self.depth,
                max_depth: self.siblings.len().min(self.path.len()),
            });
        }
        let mut node = self.leaf;
        for (sibling, bit) in self.siblings.iter().zip(&self.path).take(self.depth) {
            node = if *bit == 1 {
                hash_pair(sibling, &node)?
            } else {
                hash_pair(&node, sibling)?
            };
        }
        Ok(node)
    }

    /// Returns `true` if the proof recomputes to `root`.
    pub fn verify(&self, root: &FieldElement) -> bool {
        matches!(self.compute_root(), Ok(computed) if computed == *root)
    }
}

// ---------------------------------------------------------------------------
// Sparse tree proof
// ---------------------------------------------------------------------------

/// Membership or non-membership proof from a sparse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseMerkleProof {
    /// Tree root.
    pub root: FieldElement,
    /// The queried key.
    pub leaf: FieldElement,
    /// Key found where the lookup ended: the queried key on membership,
    /// another key sharing its path prefix, or zero for an empty slot.
    pub closest_leaf: FieldElement,
    /// Value stored under `closest_leaf`, zero for an empty slot.
    pub closest_value: FieldElement,
    /// Siblings bottom-up, unpadded.
    pub siblings: Vec<FieldElement>,
    /// Whether `leaf` is present.
    pub membership: bool,
}

/// Sparse leaf node hash: `Poseidon(key, value, 1)`.
pub fn sparse_leaf_hash(key: &FieldElement, value: &FieldElement) -> Result<FieldElement, CryptoError> {
    hash(&[*key, *value, FieldElement::from(1u64)])
}

impl SparseMerkleProof {
    /// Levels traversed.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Siblings zero-padded to `depth` entries.
    pub fn padded_siblings(&self, depth: usize) -> Result<Vec<FieldElement>, TreeError> {
        if self.siblings.len() > depth {
            return Err(TreeError::DepthExceeded {
                depth: self.siblings.len(),
                max_depth: depth,
            });
        }
        let mut out = self.siblings.clone();
        out.resize(depth, FieldElement::zero());
        Ok(out)
    }

    /// Recompute the root from the closest entry and the siblings.
    pub fn compute_root(&self) -> Result<FieldElement, TreeError> {
        let mut node = if self.closest_leaf.is_zero() && self.closest_value.is_zero() {
            FieldElement::zero()
        } else {
            sparse_leaf_hash(&self.closest_leaf, &self.closest_value)?
        };
        let depth = self.siblings.len();
        for (i, sibling) in self.siblings.iter().enumerate() {
            let level = depth - 1 - i;
            node = if self.leaf.bit(level) {
                hash_pair(sibling, &node)?
            } else {
                hash_pair(&node, sibling)?
            };
        }
        Ok(node)
    }

    /// Check the proof against its root.
    ///
    /// A membership proof must end at the queried key; a non-membership
    /// proof must end anywhere else.
    pub fn verify(&self) -> bool {
        if self.membership != (self.closest_leaf == self.leaf) {
            return false;
        }
        matches!(self.compute_root(), Ok(computed) if computed == self.root)
    }
}
