//! # Document Record
//!
//! The caller-supplied view of a passport: MRZ text, DG2 hash, the signed
//! content and signed-attribute blocks, the signature, and the signer
//! certificate already parsed into [`CertificateParams`].
//!
//! Byte arrays arrive as JSON integer arrays from toolchains that emit
//! either signed (`-128..=127`) or unsigned (`0..=255`) bytes. Both are
//! normalised to `u8` on deserialization.

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize};

use crate::algorithm::{AlgorithmProfile, Curve, HashFunction, KeyParameter, SignatureFamily};
use crate::error::{ConfigError, DocumentError, EncodingError};
use crate::field::parse_hex;
use crate::mrz::FormattedDg1;

/// Maximum DG2 hash length (a SHA-512 digest).
pub const DG2_HASH_LEN: usize = 64;

/// Resolved signer certificate parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateParams {
    /// Signature family.
    pub signature_algorithm: SignatureFamily,
    /// Hash function used by the document signer.
    pub hash_function: HashFunction,
    /// Modulus size (RSA) or field size (EC) in bits.
    pub bits: u32,
    /// Signer public key.
    pub public_key: PublicKey,
}

impl CertificateParams {
    /// Resolve these parameters to a supported profile.
    pub fn profile(&self) -> Result<AlgorithmProfile, ConfigError> {
        AlgorithmProfile::resolve(
            self.signature_algorithm,
            self.public_key.key_parameter(),
            self.hash_function,
            self.bits,
        )
    }
}

/// Signer public key material, integers as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PublicKey {
    /// RSA modulus and public exponent.
    Rsa {
        /// Modulus, hex.
        modulus: String,
        /// Public exponent.
        exponent: u32,
    },
    /// EC point on a named curve.
    Ec {
        /// Curve name.
        curve: Curve,
        /// Affine x, hex.
        x: String,
        /// Affine y, hex.
        y: String,
    },
}

impl PublicKey {
    pub fn key_parameter(&self) -> KeyParameter {
        match self {
            Self::Rsa { exponent, .. } => KeyParameter::Exponent(*exponent),
            Self::Ec { curve, .. } => KeyParameter::Curve(*curve),
        }
    }

    /// The integers the public-key signal is built from: `[n]` for RSA,
    /// `[x, y]` for EC.
    pub fn components(&self) -> Result<Vec<BigUint>, DocumentError> {
        let parse = |name: &str, hex: &str| {
            parse_hex(hex).map_err(|e| DocumentError::MalformedPublicKey(format!("{name}: {e}")))
        };
        match self {
            Self::Rsa { modulus, .. } => Ok(vec![parse("modulus", modulus)?]),
            Self::Ec { x, y, .. } => Ok(vec![parse("x", x)?, parse("y", y)?]),
        }
    }
}

/// A loaded passport record. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// 88-character TD3 MRZ.
    pub mrz: String,
    /// Hash of DG2 (facial image).
    #[serde(deserialize_with = "lenient_bytes")]
    pub dg2_hash: Vec<u8>,
    /// Signed content: the LDS security object holding data-group hashes.
    #[serde(deserialize_with = "lenient_bytes")]
    pub e_content: Vec<u8>,
    /// Signed attributes: holds the digest of `e_content`.
    #[serde(deserialize_with = "lenient_bytes")]
    pub signed_attr: Vec<u8>,
    /// Signature over `signed_attr`.
    #[serde(deserialize_with = "lenient_bytes")]
    pub encrypted_digest: Vec<u8>,
    /// Resolved signer certificate.
    pub certificate: CertificateParams,
}

impl DocumentRecord {
    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The formatted DG1 record wrapping this document's MRZ.
    pub fn dg1(&self) -> Result<FormattedDg1, DocumentError> {
        FormattedDg1::from_mrz(&self.mrz)
    }

    /// DG2 hash zero-padded to [`DG2_HASH_LEN`] bytes.
    pub fn dg2_hash_padded(&self) -> Result<[u8; DG2_HASH_LEN], DocumentError> {
        if self.dg2_hash.len() > DG2_HASH_LEN {
            return Err(DocumentError::UnsupportedLength {
                buffer: "dg2Hash",
                length: self.dg2_hash.len(),
                ceiling: DG2_HASH_LEN,
            });
        }
        let mut out = [0u8; DG2_HASH_LEN];
        out[..self.dg2_hash.len()].copy_from_slice(&self.dg2_hash);
        Ok(out)
    }
}

/// Normalise a signed or unsigned byte value.
pub fn normalize_byte(value: i64) -> Result<u8, EncodingError> {
    match value {
        0..=255 => Ok(value as u8),
        -128..=-1 => Ok((value + 256) as u8),
        _ => Err(EncodingError::InvalidByte(value)),
    }
}

fn lenient_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let raw = Vec::<i64>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|v| normalize_byte(v).map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(e_content: &str) -> String {
        format!(
            r#"{{
                "mrz": "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<L898902C36UTO7408122F1204159ZE184226B<<<<<10",
                "dg2Hash": [1, 2, 3],
                "eContent": {e_content},
                "signedAttr": [49, -1],
                "encryptedDigest": [0],
                "certificate": {{
                    "signatureAlgorithm": "rsa",
                    "hashFunction": "sha256",
                    "bits": 2048,
                    "publicKey": {{ "type": "rsa", "modulus": "0xc0ffee", "exponent": 65537 }}
                }}
            }}"#
        )
    }

    #[test]
    fn test_signed_bytes_normalised() {
        let rec = DocumentRecord::from_json(&record_json("[-128, -1, 0, 127, 255]")).unwrap();
        assert_eq!(rec.e_content, vec![128, 255, 0, 127, 255]);
        assert_eq!(rec.signed_attr, vec![49, 255]);
    }

    #[test]
    fn test_out_of_range_byte_rejected() {
        assert!(DocumentRecord::from_json(&record_json("[256]")).is_err());
        assert!(DocumentRecord::from_json(&record_json("[-129]")).is_err());
    }

    #[test]
    fn test_profile_resolution() {
        let rec = DocumentRecord::from_json(&record_json("[]")).unwrap();
        assert_eq!(rec.certificate.profile().unwrap(), AlgorithmProfile::Rsa2048Sha256);
        assert_eq!(
            rec.certificate.public_key.components().unwrap(),
            vec![BigUint::from(0xc0ffeeu32)]
        );
    }

    #[test]
    fn test_dg2_hash_padded() {
        let rec = DocumentRecord::from_json(&record_json("[]")).unwrap();
        let padded = rec.dg2_hash_padded().unwrap();
        assert_eq!(&padded[..3], &[1, 2, 3]);
        assert!(padded[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_ec_key_components() {
        let key = PublicKey::Ec {
            curve: Curve::Secp256r1,
            x: "01".into(),
            y: "not-hex".into(),
        };
        assert!(matches!(key.components(), Err(DocumentError::MalformedPublicKey(_))));
        assert_eq!(key.key_parameter(), KeyParameter::Curve(Curve::Secp256r1));
    }
}
