//! # Tree Interfaces
//!
//! Abstract interfaces for the two tree services witness assembly reads
//! from. Implementations may be in-memory, database-backed or remote.
//!
//! ## Concurrency
//!
//! Both traits require `Send + Sync`. Readers borrow `&dyn` for one request;
//! only [`IncrementalTree::insert`] takes `&mut self`, so the borrow checker
//! enforces a single writer.

use zkpp_core::{FieldElement, TreeError};

use crate::proof::{MerkleProof, SparseMerkleProof};

/// An append-only binary Merkle tree of identity commitments.
pub trait IncrementalTree: Send + Sync {
    /// Append a leaf and return its index.
    fn insert(&mut self, leaf: FieldElement) -> Result<usize, TreeError>;

    /// Index of `leaf` in canonical form.
    fn index_of(&self, leaf: &FieldElement) -> Option<usize>;

    /// Index of a leaf stored under its decimal-string form.
    ///
    /// Only backends that keep leaves in the encoding they were received in
    /// need to override this. Canonicalizing backends answer everything
    /// through [`index_of`](Self::index_of).
    fn index_of_encoded(&self, _encoded: &str) -> Option<usize> {
        None
    }

    /// Inclusion proof for the leaf at `index`, padded to `max_depth`.
    fn proof(&self, index: usize, max_depth: usize) -> Result<MerkleProof, TreeError>;

    /// Current root. Fails with [`TreeError::EmptyTree`] when there are no leaves.
    fn root(&self) -> Result<FieldElement, TreeError>;

    /// Number of leaves.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A key-addressed sparse Merkle tree supporting membership and
/// non-membership proofs.
pub trait SparseTree: Send + Sync {
    /// Current root. The empty tree has root zero.
    fn root(&self) -> FieldElement;

    /// Membership or non-membership proof for `leaf`.
    fn prove_at(&self, leaf: &FieldElement) -> Result<SparseMerkleProof, TreeError>;
}
