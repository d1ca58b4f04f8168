//! # Tree Gateway
//!
//! The calls witness assembly makes against the tree services: locate a
//! commitment, prove it, and prove a denylist leaf at a chosen granularity.
//!
//! ## Commitment Lookup
//!
//! Leaves are canonicalized to [`FieldElement`] at import, so the canonical
//! lookup normally succeeds. Some backends keep leaves in the encoding they
//! were received in; for those the decimal-string form is tried second and a
//! warning is logged, since a hit there means a serialization gap upstream.

use zkpp_core::{FieldElement, TreeError};

use crate::proof::{MerkleProof, SparseMerkleProof};
use crate::traits::{IncrementalTree, SparseTree};

/// Denylist granularity, coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofLevel {
    /// Name only.
    Name = 1,
    /// Name and date of birth.
    NameDob = 2,
    /// Passport number.
    PassportNumber = 3,
}

impl ProofLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ProofLevel {
    type Error = TreeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Name),
            2 => Ok(Self::NameDob),
            3 => Ok(Self::PassportNumber),
            other => Err(TreeError::InvalidProofLevel(other)),
        }
    }
}

/// Index of `commitment`, trying the canonical form and then the
/// decimal-string form.
pub fn locate_commitment(
    tree: &dyn IncrementalTree,
    commitment: &FieldElement,
) -> Result<usize, TreeError> {
    if let Some(index) = tree.index_of(commitment) {
        return Ok(index);
    }
    let encoded = commitment.to_decimal();
    if let Some(index) = tree.index_of_encoded(&encoded) {
        tracing::warn!(
            commitment = %encoded,
            index,
            "commitment found only under its decimal-string encoding"
        );
        return Ok(index);
    }
    Err(TreeError::CommitmentNotFound { commitment: encoded })
}

/// Locate `commitment` and prove its inclusion, padded to `max_depth`.
///
/// Returns the proof together with the root it verifies against.
pub fn prove_commitment(
    tree: &dyn IncrementalTree,
    commitment: &FieldElement,
    max_depth: usize,
) -> Result<(MerkleProof, FieldElement), TreeError> {
    let index = locate_commitment(tree, commitment)?;
    let proof = tree.proof(index, max_depth)?;
    let root = tree.root()?;
    tracing::debug!(index, depth = proof.depth, max_depth, "identity proof generated");
    Ok((proof, root))
}

/// Sparse proof for `leaf` with siblings checked against `depth`.
pub fn prove_sparse(
    tree: &dyn SparseTree,
    leaf: &FieldElement,
    depth: usize,
) -> Result<SparseMerkleProof, TreeError> {
    let proof = tree.prove_at(leaf)?;
    if proof.depth() > depth {
        return Err(TreeError::DepthExceeded {
            depth: proof.depth(),
            max_depth: depth,
        });
    }
    tracing::debug!(
        depth = proof.depth(),
        membership = proof.membership,
        "sparse proof generated"
    );
    Ok(proof)
}
