//! # zkpp-core: Foundational Types for Passport Witness Assembly
//!
//! This crate defines the primitives every other `zkpp-*` crate builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One field element type.** `FieldElement` wraps the BN254 scalar field
//!    and always renders as a decimal string, which is the only encoding the
//!    downstream proving system accepts.
//!
//! 2. **Closed algorithm set.** `AlgorithmProfile` enumerates every supported
//!    signature/hash/key-size combination. Limb geometry and profile indices
//!    are resolved by exhaustive `match`, never by string concatenation.
//!
//! 3. **Capabilities are data.** Padded-length ceilings live in an immutable
//!    `CircuitCapabilities` record handed to the assembler, so several circuit
//!    versions can coexist in one process.
//!
//! 4. **Fixed MRZ offsets.** Sub-field ranges of the formatted DG1 record are
//!    constants from the TD3 layout, not computed heuristically.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkpp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod algorithm;
pub mod config;
pub mod document;
pub mod error;
pub mod field;
pub mod identifier;
pub mod mrz;
pub mod temporal;

pub use algorithm::{AlgorithmProfile, Curve, HashFunction, KeyParameter, LimbGeometry, SignatureFamily};
pub use config::{CircuitCapabilities, CircuitCapacity};
pub use document::{CertificateParams, DocumentRecord, PublicKey};
pub use error::{ConfigError, CryptoError, DocumentError, EncodingError, TreeError, ZkppError};
pub use field::FieldElement;
pub use identifier::UserIdType;
pub use mrz::FormattedDg1;
pub use temporal::{CircuitDate, Clock, FixedClock, SystemClock};
