//! # zkpp-crypto: Circuit-Facing Primitives
//!
//! The byte- and integer-level transformations whose output layout must
//! match what the circuits were compiled against:
//!
//! - **Limbs**: big integers split into `k` limbs of `n` bits.
//! - **Padding**: Merkle–Damgård length padding, zero-extended to a fixed
//!   circuit capacity.
//! - **Offsets**: position of a digest inside its containing signed buffer.
//! - **Digests**: SHA-1 and SHA-2 selected by [`zkpp_core::HashFunction`].
//! - **Poseidon**: circom-compatible Poseidon over BN254, with a chunked
//!   form for inputs wider than the largest parameter set.
//! - **Packing**: 31 bytes per field element.
//! - **DER**: ECDSA signature `SEQUENCE { r, s }` decoding.
//!
//! ## Crate Policy
//!
//! - Depends only on `zkpp-core` internally.
//! - Every function is pure and synchronous.
//! - Tests use real SHA and real Poseidon, never mocks.

pub mod der;
pub mod digest;
pub mod limbs;
pub mod offset;
pub mod packing;
pub mod padding;
pub mod poseidon;

pub use der::EcdsaSignature;
pub use digest::digest;
pub use limbs::LimbVector;
pub use offset::{find_subarray, locate_digest};
pub use packing::pack_bytes;
pub use padding::{pad, PaddedMessage};
pub use poseidon::{chunked_hash, hash, hash_pair};
