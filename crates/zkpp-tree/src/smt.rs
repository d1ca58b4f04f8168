//! # Sparse Merkle Tree
//!
//! Compact key-addressed tree over Poseidon. The path of a key is its bit
//! string, least significant bit first. A leaf sits at the shallowest level
//! where its path prefix is unique, so the tree stays shallow even though
//! the nominal depth is 256.
//!
//! - Leaf node: `Poseidon(key, value, 1)`.
//! - Internal node: `Poseidon(left, right)`.
//! - Empty subtree: `0`.
//!
//! Lookups walk from the root and end at one of three places: the queried
//! key (membership), another key sharing the path prefix, or an empty slot.
//! The last two prove non-membership.

use std::collections::HashMap;

use zkpp_core::{FieldElement, TreeError};
use zkpp_crypto::poseidon::hash_pair;

use crate::proof::{sparse_leaf_hash, SparseMerkleProof};
use crate::traits::SparseTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Internal(FieldElement, FieldElement),
    Leaf { key: FieldElement, value: FieldElement },
}

/// Where a lookup ended.
struct Lookup {
    /// Value under the queried key, if present.
    value: Option<FieldElement>,
    /// Another entry found on the queried key's path.
    matching: Option<(FieldElement, FieldElement)>,
    /// Siblings from the root down.
    siblings: Vec<FieldElement>,
}

/// An in-memory sparse Merkle tree.
#[derive(Debug, Clone)]
pub struct SparseMerkleTree {
    depth: usize,
    root: FieldElement,
    nodes: HashMap<FieldElement, Node>,
    len: usize,
}

impl SparseMerkleTree {
    /// Create an empty tree of nominal `depth` levels.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            root: FieldElement::zero(),
            nodes: HashMap::new(),
            len: 0,
        }
    }

    /// Build a denylist tree: each key is inserted with value `1`.
    pub fn from_keys(
        depth: usize,
        keys: impl IntoIterator<Item = FieldElement>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new(depth);
        for key in keys {
            tree.insert(key, FieldElement::from(1u64))?;
        }
        Ok(tree)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &FieldElement) -> Option<FieldElement> {
        self.lookup(key).value
    }

    /// Insert `key` with `value`. Existing keys are rejected.
    pub fn insert(&mut self, key: FieldElement, value: FieldElement) -> Result<(), TreeError> {
        let Lookup {
            value: existing,
            matching,
            mut siblings,
        } = self.lookup(&key);
        if existing.is_some() {
            return Err(TreeError::DuplicateLeaf(key.to_string()));
        }

        if let Some((other_key, other_value)) = matching {
            let mut level = siblings.len();
            while other_key.bit(level) == key.bit(level) {
                siblings.push(FieldElement::zero());
                level += 1;
                if level >= self.depth {
                    return Err(TreeError::DepthExceeded {
                        depth: level + 1,
                        max_depth: self.depth,
                    });
                }
            }
            siblings.push(sparse_leaf_hash(&other_key, &other_value)?);
        }
        if siblings.len() > self.depth {
            return Err(TreeError::DepthExceeded {
                depth: siblings.len(),
                max_depth: self.depth,
            });
        }

        let leaf = sparse_leaf_hash(&key, &value)?;
        let mut created = vec![(leaf, Node::Leaf { key, value })];
        let mut node = leaf;
        for (level, sibling) in siblings.iter().enumerate().rev() {
            let (left, right) = if key.bit(level) {
                (*sibling, node)
            } else {
                (node, *sibling)
            };
            node = hash_pair(&left, &right)?;
            created.push((node, Node::Internal(left, right)));
        }

        self.nodes.extend(created);
        self.root = node;
        self.len += 1;
        Ok(())
    }

    fn lookup(&self, key: &FieldElement) -> Lookup {
        let mut siblings = Vec::new();
        let mut node = self.root;
        for level in 0..=self.depth {
            match self.nodes.get(&node) {
                None => break,
                Some(Node::Internal(left, right)) => {
                    if key.bit(level) {
                        siblings.push(*left);
                        node = *right;
                    } else {
                        siblings.push(*right);
                        node = *left;
                    }
                }
                Some(Node::Leaf { key: k, value: v }) => {
                    let (value, matching) = if k == key {
                        (Some(*v), None)
                    } else {
                        (None, Some((*k, *v)))
                    };
                    return Lookup {
                        value,
                        matching,
                        siblings,
                    };
                }
            }
        }
        Lookup {
            value: None,
            matching: None,
            siblings,
        }
    }
}

impl SparseTree for SparseMerkleTree {
    fn root(&self) -> FieldElement {
        self.root
    }

    fn prove_at(&self, leaf: &FieldElement) -> Result<SparseMerkleProof, TreeError> {
        let Lookup {
            value,
            matching,
            mut siblings,
        } = self.lookup(leaf);
        siblings.reverse();

        let (closest_leaf, closest_value, membership) = match (value, matching) {
            (Some(v), _) => (*leaf, v, true),
            (None, Some((k, v))) => (k, v, false),
            (None, None) => (FieldElement::zero(), FieldElement::zero(), false),
        };

        Ok(SparseMerkleProof {
            root: self.root,
            leaf: *leaf,
            closest_leaf,
            closest_value,
            siblings,
            membership,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from(v)
    }

    fn one() -> FieldElement {
        fe(1)
    }

    #[test]
    fn test_empty_tree() {
        let tree = SparseMerkleTree::new(256);
        assert!(tree.root().is_zero());
        let proof = tree.prove_at(&fe(5)).unwrap();
        assert!(!proof.membership);
        assert!(proof.closest_leaf.is_zero());
        assert!(proof.siblings.is_empty());
        assert!(proof.verify());
    }

    #[test]
    fn test_single_leaf_is_root() {
        let tree = SparseMerkleTree::from_keys(256, [fe(6)]).unwrap();
        assert_eq!(tree.root(), sparse_leaf_hash(&fe(6), &one()).unwrap());
    }

    #[test]
    fn test_shared_prefix_adds_zero_levels() {
        // 0b0001 and 0b0101 agree on bits 0 and 1 and split at bit 2.
        let tree = SparseMerkleTree::from_keys(256, [fe(1), fe(5)]).unwrap();
        let l1 = sparse_leaf_hash(&fe(1), &one()).unwrap();
        let l5 = sparse_leaf_hash(&fe(5), &one()).unwrap();
        let zero = FieldElement::zero();
        let split = hash_pair(&l1, &l5).unwrap();
        let level1 = hash_pair(&split, &zero).unwrap();
        let root = hash_pair(&zero, &level1).unwrap();
        assert_eq!(tree.root(), root);

        let proof = tree.prove_at(&fe(5)).unwrap();
        assert!(proof.membership);
        assert_eq!(proof.siblings, vec![l1, zero, zero]);
        assert!(proof.verify());
    }

    #[test]
    fn test_membership_and_non_membership() {
        let keys: Vec<_> = [3u64, 10, 17, 24, 99, 1000].into_iter().map(fe).collect();
        let tree = SparseMerkleTree::from_keys(256, keys.clone()).unwrap();
        for k in &keys {
            let proof = tree.prove_at(k).unwrap();
            assert!(proof.membership);
            assert_eq!(proof.closest_leaf, *k);
            assert!(proof.verify(), "member {k}");
        }
        for absent in [4u64, 11, 64, 12345] {
            let q = fe(absent);
            let proof = tree.prove_at(&q).unwrap();
            assert!(!proof.membership);
            assert_ne!(proof.closest_leaf, q);
            assert!(proof.verify(), "absent {absent}");
        }
    }

    #[test]
    fn test_insertion_order_independent() {
        let a = SparseMerkleTree::from_keys(256, [7u64, 8, 9, 200].map(fe)).unwrap();
        let b = SparseMerkleTree::from_keys(256, [200u64, 9, 7, 8].map(fe)).unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut tree = SparseMerkleTree::from_keys(256, [fe(3)]).unwrap();
        assert_eq!(
            tree.insert(fe(3), fe(2)).unwrap_err(),
            TreeError::DuplicateLeaf("3".to_string())
        );
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&fe(3)), Some(one()));
    }

    #[test]
    fn test_shallow_tree_depth_exceeded() {
        // 0 and 8 agree on their three lowest bits.
        let mut tree = SparseMerkleTree::from_keys(3, [fe(0)]).unwrap();
        assert!(matches!(
            tree.insert(fe(8), one()),
            Err(TreeError::DepthExceeded { max_depth: 3, .. })
        ));
    }

    #[test]
    fn test_tampered_proof_fails() {
        let tree = SparseMerkleTree::from_keys(256, [1u64, 2, 3].map(fe)).unwrap();
        let mut proof = tree.prove_at(&fe(2)).unwrap();
        proof.closest_value = fe(2);
        assert!(!proof.verify());
    }
}
