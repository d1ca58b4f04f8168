//! # zkpp-tree: Commitment and Denylist Trees
//!
//! The identity commitments live in an append-only lean incremental Merkle
//! tree; the denylists live in key-addressed sparse Merkle trees. Both are
//! owned by services outside witness assembly and consumed here through the
//! [`IncrementalTree`] and [`SparseTree`] traits, borrowed for the duration
//! of one request.
//!
//! Reference in-memory implementations ([`LeanImt`], [`SparseMerkleTree`])
//! use the same Poseidon node hashing as the circuits, so a proof produced
//! from them verifies in-circuit.
//!
//! ## Crate Policy
//!
//! - Depends on `zkpp-core` and `zkpp-crypto` internally.
//! - Proof recomputation is part of the proof types, so every test checks
//!   proofs against roots rather than against fixtures.

pub mod gateway;
pub mod lean_imt;
pub mod proof;
pub mod smt;
pub mod traits;

pub use gateway::{locate_commitment, prove_commitment, prove_sparse, ProofLevel};
pub use lean_imt::LeanImt;
pub use proof::{MerkleProof, SparseMerkleProof};
pub use smt::SparseMerkleTree;
pub use traits::{IncrementalTree, SparseTree};
