//! # Error Types: Structured Error Hierarchy
//!
//! Every failure in witness assembly reflects malformed input or a
//! configuration gap, never a transient condition, so nothing here is
//! retried internally. Each concern gets its own `thiserror` enum and
//! [`ZkppError`] aggregates them for pipeline callers.
//!
//! ## Design
//!
//! - Capacity failures carry the offending length and the configured ceiling
//!   so operators know what to extend.
//! - Digest embedding failures carry the computed digest for diagnostics.
//! - Tree lookups distinguish data errors (`CommitmentNotFound`) from
//!   programming errors (`InvalidProofLevel`).

use thiserror::Error;

/// Top-level error type for witness assembly.
#[derive(Error, Debug)]
pub enum ZkppError {
    /// A value could not be encoded into circuit signals.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The document record is malformed or exceeds circuit capacity.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// A tree lookup or proof failed.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// The capability configuration does not cover the request.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A hash primitive failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Error while converting values to circuit encodings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The integer does not fit the limb geometry.
    #[error("integer of {value_bits} bits does not fit {word_count} limbs of {word_bits} bits")]
    Overflow {
        /// Bit length of the rejected value.
        value_bits: u64,
        /// Limb width.
        word_bits: usize,
        /// Limb count.
        word_count: usize,
    },

    /// The integer is not below the BN254 scalar field modulus.
    #[error("value {0} is not a BN254 field element")]
    FieldOverflow(String),

    /// Not a non-negative decimal integer.
    #[error("invalid decimal integer: {0:?}")]
    InvalidDecimal(String),

    /// Not a hexadecimal integer.
    #[error("invalid hex integer: {0:?}")]
    InvalidHex(String),

    /// Not a UUID.
    #[error("invalid UUID: {0:?}")]
    InvalidUuid(String),

    /// A string exceeds the characters one field element can carry.
    #[error("string of {actual} characters exceeds the maximum of {max}")]
    StringTooLong {
        /// Maximum number of characters.
        max: usize,
        /// Characters supplied.
        actual: usize,
    },

    /// A string meant for character-code encoding contains non-ASCII text.
    #[error("non-ASCII character in {0:?}")]
    NonAscii(String),

    /// A selector signal is not a well-formed bit array.
    #[error("invalid selector {signal}: {reason}")]
    InvalidSelector {
        /// Signal name.
        signal: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// The majority threshold is not one or two ASCII digits.
    #[error("invalid majority threshold: {0:?}")]
    InvalidMajority(String),

    /// More forbidden countries than the circuit has slots for.
    #[error("{actual} forbidden countries exceed the circuit limit of {max}")]
    TooManyCountries {
        /// Circuit slots.
        max: usize,
        /// Countries supplied.
        actual: usize,
    },

    /// A country code is not three ASCII letters.
    #[error("invalid country code: {0:?}")]
    InvalidCountryCode(String),

    /// A byte value outside both the signed and unsigned byte ranges.
    #[error("byte value out of range: {0}")]
    InvalidByte(i64),
}

/// Error in the document record or its signed buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The MRZ is not an 88-character ASCII TD3 zone.
    #[error("invalid MRZ: {0}")]
    InvalidMrz(String),

    /// An expected digest was not found inside its containing buffer.
    #[error("digest {digest_hex} not embedded in {container}")]
    DigestNotEmbedded {
        /// Buffer that was searched.
        container: &'static str,
        /// The computed digest, lowercase hex.
        digest_hex: String,
    },

    /// A signed buffer exceeds the circuit's fixed input capacity.
    #[error("{buffer} of {length} bytes exceeds the circuit capacity of {ceiling} padded bytes")]
    UnsupportedLength {
        /// Which buffer.
        buffer: &'static str,
        /// Unpadded length in bytes.
        length: usize,
        /// Configured padded ceiling in bytes.
        ceiling: usize,
    },

    /// The signature bytes cannot be decoded for the signature family.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The certificate's public key does not match its signature family.
    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),
}

/// Error in tree lookups and proofs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The commitment is absent under both its canonical and encoded forms.
    #[error("commitment {commitment} not found in the identity tree")]
    CommitmentNotFound {
        /// Decimal rendering of the commitment.
        commitment: String,
    },

    /// Denylist granularity outside 1..=3.
    #[error("invalid proof level {0}: expected 1 (name), 2 (name+dob) or 3 (passport number)")]
    InvalidProofLevel(u8),

    /// The tree has no leaves.
    #[error("tree is empty")]
    EmptyTree,

    /// Proof requested for an index past the last leaf.
    #[error("leaf index {index} out of range for tree of size {size}")]
    LeafIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        size: usize,
    },

    /// The proof is deeper than the circuit accepts.
    #[error("proof depth {depth} exceeds circuit maximum {max_depth}")]
    DepthExceeded {
        /// Depth of the proof.
        depth: usize,
        /// Circuit maximum.
        max_depth: usize,
    },

    /// The key is already present in the sparse tree.
    #[error("leaf {0} already present")]
    DuplicateLeaf(String),

    /// An imported tree does not hash to its stored root.
    #[error("root mismatch: stored {expected}, recomputed {computed}")]
    RootMismatch {
        /// Root carried by the export.
        expected: String,
        /// Root recomputed from leaves.
        computed: String,
    },

    /// A tree export could not be parsed.
    #[error("tree import failed: {0}")]
    Import(String),

    /// Hashing a node failed.
    #[error("node hash failed: {0}")]
    Hash(#[from] CryptoError),
}

/// Error in the capability configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No profile matches the certificate parameters.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The profile is supported but has no registered ceilings.
    #[error("no circuit capacity registered for {0}")]
    CapacityNotRegistered(String),

    /// A ceiling cannot hold whole hash blocks.
    #[error("{buffer} ceiling {ceiling} for {profile} is not a positive multiple of the {block}-byte block")]
    MisalignedCapacity {
        /// Profile key.
        profile: String,
        /// Buffer name.
        buffer: &'static str,
        /// Configured ceiling.
        ceiling: usize,
        /// Hash block size.
        block: usize,
    },

    /// Host country is not three uppercase ASCII letters.
    #[error("invalid host country: {0:?}")]
    InvalidHostCountry(String),

    /// A tree depth is zero or beyond what a field element path supports.
    #[error("invalid {tree} depth {depth}")]
    InvalidDepth {
        /// Which tree.
        tree: &'static str,
        /// Configured depth.
        depth: usize,
    },

    /// YAML parse failure.
    #[error("failed to parse capabilities: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// IO error while reading a capabilities file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error in hash primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The Poseidon parameters do not cover this many inputs.
    #[error("poseidon arity {0} unsupported (expected 1..=12)")]
    UnsupportedArity(usize),

    /// The Poseidon backend rejected the inputs.
    #[error("poseidon hash failed: {0}")]
    Poseidon(String),
}
