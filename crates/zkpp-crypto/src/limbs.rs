//! # Limb Encoding
//!
//! Circuits do big-integer arithmetic on fixed arrays of native-width words.
//! [`LimbVector::split`] produces exactly `k` limbs of `n` bits, least
//! significant limb first; [`LimbVector::join`] reassembles them.
//!
//! ## Invariant
//!
//! `split` never truncates. A value of `n * k` bits or more fails with
//! [`EncodingError::Overflow`], which in practice means the geometry table
//! and the certificate disagree about the key size.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use zkpp_core::{EncodingError, FieldElement, LimbGeometry};

/// Exactly `k` limbs, each `< 2^n`, least significant first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimbVector {
    geometry: LimbGeometry,
    limbs: Vec<BigUint>,
}

impl LimbVector {
    /// Split `value` into `geometry.word_count` limbs of `geometry.word_bits`.
    pub fn split(value: &BigUint, geometry: LimbGeometry) -> Result<Self, EncodingError> {
        let capacity = geometry.capacity_bits() as u64;
        if value.bits() > capacity {
            return Err(EncodingError::Overflow {
                value_bits: value.bits(),
                word_bits: geometry.word_bits,
                word_count: geometry.word_count,
            });
        }

        let mask = (BigUint::one() << geometry.word_bits) - BigUint::one();
        let mut rest = value.clone();
        let mut limbs = Vec::with_capacity(geometry.word_count);
        for _ in 0..geometry.word_count {
            limbs.push(&rest & &mask);
            rest >>= geometry.word_bits;
        }
        debug_assert!(rest.is_zero());

        Ok(Self { geometry, limbs })
    }

    /// Reassemble the integer. Exact inverse of [`split`](Self::split).
    pub fn join(&self) -> BigUint {
        self.limbs
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, limb| (acc << self.geometry.word_bits) + limb)
    }

    pub fn geometry(&self) -> LimbGeometry {
        self.geometry
    }

    pub fn limbs(&self) -> &[BigUint] {
        &self.limbs
    }

    /// Limbs as field elements.
    ///
    /// Limbs are at most 121 bits wide, far below the BN254 modulus, but the
    /// conversion is still checked.
    pub fn to_fields(&self) -> Result<Vec<FieldElement>, EncodingError> {
        self.limbs.iter().map(FieldElement::from_biguint).collect()
    }

    /// Limbs as decimal strings.
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.limbs.iter().map(|l| l.to_str_radix(10)).collect()
    }
}
