//! # Byte Packing
//!
//! Packs bytes into field elements, 31 bytes per element (248 bits, below
//! the BN254 modulus). Inside a chunk the first byte is the least
//! significant. The final chunk may be short.

use ark_bn254::Fr;
use ark_ff::PrimeField;

use zkpp_core::FieldElement;

/// Bytes carried by one packed element.
pub const BYTES_PER_ELEMENT: usize = 31;

/// Number of elements [`pack_bytes`] produces for `len` bytes.
pub fn packed_len(len: usize) -> usize {
    len.div_ceil(BYTES_PER_ELEMENT)
}

/// Pack `bytes` into `ceil(len / 31)` field elements.
pub fn pack_bytes(bytes: &[u8]) -> Vec<FieldElement> {
    bytes
        .chunks(BYTES_PER_ELEMENT)
        .map(|chunk| FieldElement::from_fr(Fr::from_le_bytes_mod_order(chunk)))
        .collect()
}

/// Widen bytes to one field element each.
pub fn bytes_to_fields(bytes: &[u8]) -> Vec<FieldElement> {
    bytes.iter().map(|b| FieldElement::from(*b)).collect()
}
