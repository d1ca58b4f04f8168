//! # Poseidon: Circuit-Native Hashing
//!
//! Circom-compatible Poseidon over the BN254 scalar field, backed by
//! `light-poseidon`. Every leaf and tree node is a Poseidon digest, so the
//! parameters here must be the ones the circuits' `Poseidon(n)` templates
//! use.
//!
//! ## Arity
//!
//! The circom parameter sets cover 1 to 12 inputs. Wider inputs go through
//! [`chunked_hash`]: Poseidon over consecutive 12-element chunks, then over
//! the chunk digests, recursively until one element remains.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};

use zkpp_core::{CryptoError, FieldElement};

/// Widest input with a circom parameter set.
pub const MAX_ARITY: usize = 12;

/// Poseidon over 1 to [`MAX_ARITY`] field elements.
pub fn hash(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    if inputs.is_empty() || inputs.len() > MAX_ARITY {
        return Err(CryptoError::UnsupportedArity(inputs.len()));
    }
    let mut hasher =
        Poseidon::<Fr>::new_circom(inputs.len()).map_err(|e| CryptoError::Poseidon(e.to_string()))?;
    let frs: Vec<Fr> = inputs.iter().map(|fe| *fe.as_fr()).collect();
    hasher
        .hash(&frs)
        .map(FieldElement::from_fr)
        .map_err(|e| CryptoError::Poseidon(e.to_string()))
}

/// Two-to-one node hash.
pub fn hash_pair(left: &FieldElement, right: &FieldElement) -> Result<FieldElement, CryptoError> {
    hash(&[*left, *right])
}

/// Poseidon over any non-empty number of inputs.
///
/// Identical to [`hash`] for up to [`MAX_ARITY`] inputs.
pub fn chunked_hash(inputs: &[FieldElement]) -> Result<FieldElement, CryptoError> {
    if inputs.len() <= MAX_ARITY {
        return hash(inputs);
    }
    let digests = inputs
        .chunks(MAX_ARITY)
        .map(hash)
        .collect::<Result<Vec<_>, _>>()?;
    chunked_hash(&digests)
}
