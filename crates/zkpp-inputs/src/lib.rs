//! # zkpp-inputs: Circuit Input Assembly
//!
//! Assembles the witness inputs for the passport circuits from a document
//! record, verifier parameters and tree handles. The output of every
//! pipeline is a [`CircuitInputSet`]: signal name to decimal strings.
//!
//! ## Modules
//!
//! - [`assembler`]: the disclosure, denylist, country and full-proof pipelines.
//! - [`leaves`]: commitment, public-key, denylist and country leaves.
//! - [`encoding`]: scope, user identifier, majority, country list, selectors.
//! - [`signals`]: the signal-name table and the output map.
//! - [`registration`]: building identity trees from documents.
//!
//! ## Crate Policy
//!
//! - Pipelines are pure functions of their inputs, the capabilities and the
//!   clock. Nothing is cached between calls.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod assembler;
pub mod encoding;
pub mod leaves;
pub mod registration;
pub mod signals;

pub use assembler::{DisclosureRequest, InputAssembler, ProveRequest};
pub use registration::identity_tree_with_commitment;
pub use signals::CircuitInputSet;
