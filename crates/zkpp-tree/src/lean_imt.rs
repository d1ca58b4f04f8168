//! # Lean Incremental Merkle Tree
//!
//! Append-only binary tree with Poseidon node hashing. Unlike a
//! fixed-depth incremental tree there are no zero leaves: a node with no
//! right sibling is carried to the next level unhashed, so the depth is
//! `ceil(log2(size))` and grows as leaves are appended.
//!
//! ## Proof Layout
//!
//! Levels where the node had no sibling contribute nothing to a proof. The
//! proof keeps only the levels that did, and its packed index is built from
//! their path bits. The circuit folds exactly those `depth` levels.
//!
//! ## Import
//!
//! Tree services export the full node matrix as JSON, with nodes as
//! decimal strings or integers. [`LeanImt::import_json`] canonicalizes every
//! leaf to a [`FieldElement`] at this boundary, rebuilds the tree and checks
//! the exported root.

use zkpp_core::{FieldElement, TreeError};
use zkpp_crypto::poseidon::hash_pair;

use crate::proof::MerkleProof;
use crate::traits::IncrementalTree;

/// An in-memory lean incremental Merkle tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeanImt {
    /// `nodes[0]` holds the leaves; `nodes[depth]` holds the root.
    nodes: Vec<Vec<FieldElement>>,
}

impl LeanImt {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { nodes: vec![Vec::new()] }
    }

    /// Build a tree from leaves in insertion order.
    pub fn from_leaves(leaves: impl IntoIterator<Item = FieldElement>) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for leaf in leaves {
            tree.insert(leaf)?;
        }
        Ok(tree)
    }

    /// Current depth: `ceil(log2(size))`, zero for zero or one leaves.
    pub fn depth(&self) -> usize {
        depth_for(self.len())
    }

    pub fn leaves(&self) -> &[FieldElement] {
        self.nodes.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rebuild from an exported node matrix and check its root.
    pub fn import_json(json: &str) -> Result<Self, TreeError> {
        let exported: Vec<Vec<FieldElement>> =
            serde_json::from_str(json).map_err(|e| TreeError::Import(e.to_string()))?;
        Self::import_nodes(exported)
    }

    /// Rebuild from a node matrix and check its root.
    pub fn import_nodes(exported: Vec<Vec<FieldElement>>) -> Result<Self, TreeError> {
        let leaves = exported.first().cloned().unwrap_or_default();
        let tree = Self::from_leaves(leaves)?;
        if let Some(stored) = exported.last().and_then(|level| level.first()) {
            let computed = tree.root()?;
            if computed != *stored {
                return Err(TreeError::RootMismatch {
                    expected: stored.to_string(),
                    computed: computed.to_string(),
                });
            }
        }
        tracing::debug!(size = tree.len(), depth = tree.depth(), "imported identity tree");
        Ok(tree)
    }

    /// Export the node matrix with nodes as decimal strings.
    pub fn export_json(&self) -> Result<String, TreeError> {
        serde_json::to_string(&self.nodes).map_err(|e| TreeError::Import(e.to_string()))
    }

    fn set_node(&mut self, level: usize, index: usize, node: FieldElement) {
        let row = &mut self.nodes[level];
        if index < row.len() {
            row[index] = node;
        } else {
            row.push(node);
        }
    }
}

impl Default for LeanImt {
    fn default() -> Self {
        Self::new()
    }
}

fn depth_for(size: usize) -> usize {
    if size <= 1 {
        0
    } else {
        (usize::BITS - (size - 1).leading_zeros()) as usize
    }
}

impl IncrementalTree for LeanImt {
    fn insert(&mut self, leaf: FieldElement) -> Result<usize, TreeError> {
        let index = self.len();
        let depth = depth_for(index + 1);

        // Hash the new path first so a failure leaves the tree untouched.
        let mut path = Vec::with_capacity(depth + 1);
        let mut node = leaf;
        let mut idx = index;
        for level in 0..depth {
            path.push((level, idx, node));
            if idx & 1 == 1 {
                let sibling = self.nodes[level][idx - 1];
                node = hash_pair(&sibling, &node)?;
            }
            idx >>= 1;
        }

        while self.nodes.len() < depth + 1 {
            self.nodes.push(Vec::new());
        }
        for (level, idx, value) in path {
            self.set_node(level, idx, value);
        }
        self.nodes[depth] = vec![node];
        Ok(index)
    }

    fn index_of(&self, leaf: &FieldElement) -> Option<usize> {
        self.leaves().iter().position(|l| l == leaf)
    }

    fn proof(&self, index: usize, max_depth: usize) -> Result<MerkleProof, TreeError> {
        let size = self.len();
        if index >= size {
            return Err(TreeError::LeafIndexOutOfRange { index, size });
        }

        let mut siblings = Vec::new();
        let mut bits = Vec::new();
        let mut idx = index;
        for level in 0..self.depth() {
            let is_right = idx & 1 == 1;
            let sibling_index = if is_right { idx - 1 } else { idx + 1 };
            if let Some(sibling) = self.nodes[level].get(sibling_index) {
                siblings.push(*sibling);
                bits.push(u8::from(is_right));
            }
            idx >>= 1;
        }

        let depth = siblings.len();
        if depth > max_depth {
            return Err(TreeError::DepthExceeded { depth, max_depth });
        }
        let packed = bits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, bit)| acc | (u64::from(*bit) << i));
        bits.resize(max_depth, 0);
        siblings.resize(max_depth, FieldElement::zero());

        Ok(MerkleProof {
            leaf: self.nodes[0][index],
            index: packed,
            siblings,
            path: bits,
            depth,
        })
    }

    fn root(&self) -> Result<FieldElement, TreeError> {
        self.nodes
            .last()
            .and_then(|level| level.first())
            .copied()
            .ok_or(TreeError::EmptyTree)
    }

    fn len(&self) -> usize {
        self.leaves().len()
    }
}
