//! # Field Elements: BN254 Scalars as Decimal Strings
//!
//! Defines `FieldElement`, the unit of every circuit signal. The proving
//! system consumes field elements as decimal strings, so `Display`,
//! `FromStr` and serde all use that form.
//!
//! ## Canonicalization Invariant
//!
//! Deserialization accepts either a decimal string or a JSON integer and
//! produces the same value. This is the tree boundary contract: a leaf that
//! arrives as `"123"` or as `123` is the same leaf afterwards.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};
use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    /// Wrap a raw arkworks scalar.
    pub fn from_fr(fr: Fr) -> Self {
        Self(fr)
    }

    /// Access the raw arkworks scalar.
    pub fn as_fr(&self) -> &Fr {
        &self.0
    }

    /// Returns `true` for the zero element.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The field modulus `p`.
    pub fn modulus() -> BigUint {
        BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le())
    }

    /// Convert an unbounded integer, rejecting values `>= p`.
    ///
    /// There is no silent reduction: a value that does not fit is an
    /// encoding bug upstream.
    pub fn from_biguint(value: &BigUint) -> Result<Self, EncodingError> {
        if *value >= Self::modulus() {
            return Err(EncodingError::FieldOverflow(value.to_string()));
        }
        Ok(Self(Fr::from_le_bytes_mod_order(&value.to_bytes_le())))
    }

    /// The canonical integer representative in `[0, p)`.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0.into_bigint().to_bytes_le())
    }

    /// Render as a decimal string (the signal encoding).
    pub fn to_decimal(&self) -> String {
        self.to_biguint().to_str_radix(10)
    }

    /// Bit `index` of the canonical representative, least significant first.
    pub fn bit(&self, index: usize) -> bool {
        self.to_biguint().bit(index as u64)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl From<u8> for FieldElement {
    fn from(value: u8) -> Self {
        Self(Fr::from(u64::from(value)))
    }
}

impl FromStr for FieldElement {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = parse_decimal(s)?;
        Self::from_biguint(&value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldElementVisitor)
    }
}

struct FieldElementVisitor;

impl<'de> Visitor<'de> for FieldElementVisitor {
    type Value = FieldElement;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or non-negative integer field element")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(FieldElement::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(FieldElement::from)
            .map_err(|_| E::custom(EncodingError::InvalidDecimal(v.to_string())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

/// Parse a non-negative decimal integer of any size.
pub fn parse_decimal(s: &str) -> Result<BigUint, EncodingError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidDecimal(s.to_string()));
    }
    BigUint::parse_bytes(trimmed.as_bytes(), 10)
        .ok_or_else(|| EncodingError::InvalidDecimal(s.to_string()))
}

/// Parse a hexadecimal integer of any size, with an optional `0x` prefix.
pub fn parse_hex(s: &str) -> Result<BigUint, EncodingError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EncodingError::InvalidHex(s.to_string()));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| EncodingError::InvalidHex(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULUS: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn test_modulus_matches_bn254() {
        assert_eq!(FieldElement::modulus().to_string(), MODULUS);
    }

    #[test]
    fn test_decimal_roundtrip() {
        let fe: FieldElement = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(fe.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn test_modulus_rejected() {
        let err = MODULUS.parse::<FieldElement>().unwrap_err();
        assert!(matches!(err, EncodingError::FieldOverflow(_)));
    }

    #[test]
    fn test_largest_element_accepted() {
        let max = FieldElement::modulus() - 1u32;
        let fe = FieldElement::from_biguint(&max).unwrap();
        assert_eq!(fe.to_biguint(), max);
    }

    #[test]
    fn test_invalid_decimal_rejected() {
        assert!("".parse::<FieldElement>().is_err());
        assert!("-1".parse::<FieldElement>().is_err());
        assert!("12a".parse::<FieldElement>().is_err());
    }

    #[test]
    fn test_deserialize_string_and_number_agree() {
        let from_str: FieldElement = serde_json::from_str("\"42\"").unwrap();
        let from_num: FieldElement = serde_json::from_str("42").unwrap();
        assert_eq!(from_str, from_num);
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"42\"");
    }

    #[test]
    fn test_bits_little_endian() {
        let fe = FieldElement::from(0b101u64);
        assert!(fe.bit(0));
        assert!(!fe.bit(1));
        assert!(fe.bit(2));
        assert!(!fe.bit(200));
    }

    #[test]
    fn test_parse_hex_prefixes() {
        assert_eq!(parse_hex("0xff").unwrap(), BigUint::from(255u32));
        assert_eq!(parse_hex("FF").unwrap(), BigUint::from(255u32));
        assert!(parse_hex("0x").is_err());
        assert!(parse_hex("zz").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decimal_rendering_matches_integer(value in any::<u64>()) {
                let fe = FieldElement::from(value);
                prop_assert_eq!(fe.to_decimal(), value.to_string());
                prop_assert_eq!(fe.to_decimal().parse::<FieldElement>().unwrap(), fe);
            }

            #[test]
            fn bits_match_integer(value in any::<u64>(), index in 0usize..64) {
                prop_assert_eq!(FieldElement::from(value).bit(index), (value >> index) & 1 == 1);
            }
        }
    }
}
