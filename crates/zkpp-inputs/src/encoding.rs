//! # Signal Encodings
//!
//! Conversions from verifier-supplied strings to the integers the circuits
//! expect: scope, user identifier, majority threshold, forbidden-country
//! list and selector bit arrays.
//!
//! ## Character-Code Encoding
//!
//! Scopes and ASCII user identifiers become one integer: the digit `1`
//! followed by each character's code as three decimal digits. The leading
//! `1` keeps leading NULs and zero codes from collapsing. At most 25
//! characters fit below the BN254 modulus.

use num_bigint::BigUint;
use uuid::Uuid;

use zkpp_core::field::parse_hex;
use zkpp_core::{EncodingError, FieldElement, UserIdType};

/// Longest string the character-code encoding accepts.
pub const MAX_ENCODED_CHARS: usize = 25;

/// Characters in a country code.
pub const COUNTRY_CODE_LEN: usize = 3;

/// Bits in the DG1 disclosure selector, one per MRZ character.
pub const SELECTOR_DG1_LEN: usize = 88;

/// Bits in the full-proof mode selector.
pub const SELECTOR_MODE_LEN: usize = 2;

/// Encode `text` as `1` followed by three-digit character codes.
pub fn encode_ascii(text: &str) -> Result<FieldElement, EncodingError> {
    if !text.is_ascii() {
        return Err(EncodingError::NonAscii(text.to_string()));
    }
    if text.len() > MAX_ENCODED_CHARS {
        return Err(EncodingError::StringTooLong {
            max: MAX_ENCODED_CHARS,
            actual: text.len(),
        });
    }
    let mut digits = String::with_capacity(1 + 3 * text.len());
    digits.push('1');
    for b in text.bytes() {
        digits.push_str(&format!("{b:03}"));
    }
    let value = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| EncodingError::InvalidDecimal(digits.clone()))?;
    FieldElement::from_biguint(&value)
}

/// Scope signal.
pub fn encode_scope(scope: &str) -> Result<FieldElement, EncodingError> {
    encode_ascii(scope)
}

/// User identifier signal under the chosen representation.
pub fn encode_user_identifier(value: &str, kind: UserIdType) -> Result<FieldElement, EncodingError> {
    match kind {
        UserIdType::Uuid => {
            let uuid =
                Uuid::parse_str(value.trim()).map_err(|_| EncodingError::InvalidUuid(value.to_string()))?;
            Ok(FieldElement::from_biguint(&BigUint::from(uuid.as_u128()))?)
        }
        UserIdType::Hex => FieldElement::from_biguint(&parse_hex(value)?),
        UserIdType::Ascii => encode_ascii(value),
    }
}

/// Majority threshold as two ASCII digit codes, left-padded with `0`.
pub fn encode_majority(majority: &str) -> Result<[u8; 2], EncodingError> {
    let bytes = majority.as_bytes();
    if bytes.is_empty() || bytes.len() > 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(EncodingError::InvalidMajority(majority.to_string()));
    }
    Ok(match bytes {
        [d] => [b'0', *d],
        [t, d] => [*t, *d],
        _ => return Err(EncodingError::InvalidMajority(majority.to_string())),
    })
}

/// Forbidden countries, each as three character codes, padded with NUL
/// codes to exactly `max` entries.
pub fn encode_forbidden_countries(countries: &[String], max: usize) -> Result<Vec<u8>, EncodingError> {
    if countries.len() > max {
        return Err(EncodingError::TooManyCountries {
            max,
            actual: countries.len(),
        });
    }
    let mut out = vec![0u8; max * COUNTRY_CODE_LEN];
    for (slot, code) in countries.iter().enumerate() {
        let bytes = code.as_bytes();
        if bytes.len() != COUNTRY_CODE_LEN || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(EncodingError::InvalidCountryCode(code.clone()));
        }
        let start = slot * COUNTRY_CODE_LEN;
        out[start..start + COUNTRY_CODE_LEN].copy_from_slice(bytes);
    }
    Ok(out)
}

/// Host country as three character codes.
pub fn encode_country(code: &str) -> Result<[u8; COUNTRY_CODE_LEN], EncodingError> {
    let bytes = code.as_bytes();
    if bytes.len() != COUNTRY_CODE_LEN || !bytes.iter().all(u8::is_ascii_alphabetic) {
        return Err(EncodingError::InvalidCountryCode(code.to_string()));
    }
    Ok([bytes[0], bytes[1], bytes[2]])
}

/// Check that `bits` is a 0/1 array of `expected` entries.
pub fn check_selector(signal: &'static str, bits: &[u8], expected: usize) -> Result<(), EncodingError> {
    if bits.len() != expected {
        return Err(EncodingError::InvalidSelector {
            signal,
            reason: format!("expected {expected} bits, got {}", bits.len()),
        });
    }
    if let Some(pos) = bits.iter().position(|b| *b > 1) {
        return Err(EncodingError::InvalidSelector {
            signal,
            reason: format!("value {} at position {pos} is not a bit", bits[pos]),
        });
    }
    Ok(())
}

/// Check a single-bit selector.
pub fn check_flag(signal: &'static str, bit: u8) -> Result<(), EncodingError> {
    check_selector(signal, &[bit], 1)
}
