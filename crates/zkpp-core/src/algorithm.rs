//! # Algorithm Profiles
//!
//! A document signer's certificate resolves to exactly one
//! [`AlgorithmProfile`]: a closed enumeration of the
//! `{signature family, curve or exponent, hash, key bits}` combinations the
//! circuits are compiled for. Each variant fixes its limb geometry, hash
//! function and signature-algorithm index.
//!
//! ## Security Invariant
//!
//! Adding a profile forces every `match` below to handle it. An unrecognized
//! certificate fails with [`ConfigError::UnsupportedAlgorithm`] instead of
//! falling through to some default geometry.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Limb width used for RSA moduli and signatures.
pub const RSA_WORD_BITS: usize = 121;

/// Limb width used for ECDSA coordinates and signature scalars.
pub const ECDSA_WORD_BITS: usize = 64;

/// Hash function named by the signer's certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    /// SHA-1 (64-byte block).
    Sha1,
    /// SHA-256 (64-byte block).
    Sha256,
    /// SHA-384 (128-byte block).
    Sha384,
    /// SHA-512 (128-byte block).
    Sha512,
}

impl HashFunction {
    /// Compression block size in bytes.
    pub fn block_size(&self) -> usize {
        match self {
            Self::Sha1 | Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512 => 128,
        }
    }

    /// Size of the big-endian bit-length suffix in bytes.
    pub fn length_field_size(&self) -> usize {
        match self {
            Self::Sha1 | Self::Sha256 => 8,
            Self::Sha384 | Self::Sha512 => 16,
        }
    }

    /// Minimum bytes padding adds: the `0x80` marker plus the length field.
    pub fn padding_overhead(&self) -> usize {
        1 + self.length_field_size()
    }

    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl std::fmt::Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature scheme family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureFamily {
    /// RSA PKCS#1 v1.5.
    Rsa,
    /// RSASSA-PSS.
    RsaPss,
    /// ECDSA.
    Ecdsa,
}

impl SignatureFamily {
    /// Returns the identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::RsaPss => "rsapss",
            Self::Ecdsa => "ecdsa",
        }
    }

    /// Limb width in bits for this family.
    pub fn word_bits(&self) -> usize {
        match self {
            Self::Rsa | Self::RsaPss => RSA_WORD_BITS,
            Self::Ecdsa => ECDSA_WORD_BITS,
        }
    }
}

impl std::fmt::Display for SignatureFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named elliptic curve of an ECDSA signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Curve {
    /// NIST P-256.
    #[serde(rename = "secp256r1")]
    Secp256r1,
    /// NIST P-384.
    #[serde(rename = "secp384r1")]
    Secp384r1,
    /// Brainpool P-256r1.
    #[serde(rename = "brainpoolP256r1")]
    BrainpoolP256r1,
}

impl Curve {
    /// Returns the curve name as it appears in profile keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secp256r1 => "secp256r1",
            Self::Secp384r1 => "secp384r1",
            Self::BrainpoolP256r1 => "brainpoolP256r1",
        }
    }
}

/// The key parameter that completes a profile: RSA exponent or EC curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyParameter {
    /// Public RSA exponent.
    Exponent(u32),
    /// Named curve.
    Curve(Curve),
}

impl std::fmt::Display for KeyParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exponent(e) => write!(f, "{e}"),
            Self::Curve(c) => f.write_str(c.as_str()),
        }
    }
}

/// Limb geometry `(n, k)`: `k` limbs of `n` bits each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LimbGeometry {
    /// Bits per limb (`n`).
    pub word_bits: usize,
    /// Number of limbs (`k`).
    pub word_count: usize,
}

impl LimbGeometry {
    /// Smallest geometry of `word_bits`-wide limbs covering `bits` bits.
    pub fn covering(bits: u32, word_bits: usize) -> Self {
        Self {
            word_bits,
            word_count: (bits as usize).div_ceil(word_bits),
        }
    }

    /// Total capacity in bits (`n * k`).
    pub fn capacity_bits(&self) -> usize {
        self.word_bits * self.word_count
    }
}

/// A supported signature/hash/key-size combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlgorithmProfile {
    /// `rsa_65537_sha256_2048`
    Rsa2048Sha256,
    /// `rsa_65537_sha1_2048`
    Rsa2048Sha1,
    /// `rsapss_65537_sha256_2048`
    RsaPss2048Sha256,
    /// `rsa_65537_sha256_3072`
    Rsa3072Sha256,
    /// `rsapss_65537_sha256_3072`
    RsaPss3072Sha256,
    /// `rsa_65537_sha256_4096`
    Rsa4096Sha256,
    /// `rsa_65537_sha512_4096`
    Rsa4096Sha512,
    /// `rsapss_3_sha256_4096`
    RsaPss4096Sha256E3,
    /// `ecdsa_secp256r1_sha256_256`
    EcdsaP256Sha256,
    /// `ecdsa_secp256r1_sha1_256`
    EcdsaP256Sha1,
    /// `ecdsa_secp384r1_sha384_384`
    EcdsaP384Sha384,
    /// `ecdsa_brainpoolP256r1_sha256_256`
    EcdsaBrainpoolP256Sha256,
}

impl AlgorithmProfile {
    /// Every supported profile, in index order.
    pub const ALL: [AlgorithmProfile; 12] = [
        Self::Rsa2048Sha256,
        Self::Rsa2048Sha1,
        Self::RsaPss2048Sha256,
        Self::Rsa3072Sha256,
        Self::RsaPss3072Sha256,
        Self::Rsa4096Sha256,
        Self::Rsa4096Sha512,
        Self::RsaPss4096Sha256E3,
        Self::EcdsaP256Sha256,
        Self::EcdsaP256Sha1,
        Self::EcdsaP384Sha384,
        Self::EcdsaBrainpoolP256Sha256,
    ];

    /// Signature family.
    pub fn family(&self) -> SignatureFamily {
        match self {
            Self::Rsa2048Sha256
            | Self::Rsa2048Sha1
            | Self::Rsa3072Sha256
            | Self::Rsa4096Sha256
            | Self::Rsa4096Sha512 => SignatureFamily::Rsa,
            Self::RsaPss2048Sha256 | Self::RsaPss3072Sha256 | Self::RsaPss4096Sha256E3 => {
                SignatureFamily::RsaPss
            }
            Self::EcdsaP256Sha256
            | Self::EcdsaP256Sha1
            | Self::EcdsaP384Sha384
            | Self::EcdsaBrainpoolP256Sha256 => SignatureFamily::Ecdsa,
        }
    }

    /// Hash function used for DG1, eContent and signedAttr digests.
    pub fn hash(&self) -> HashFunction {
        match self {
            Self::Rsa2048Sha1 | Self::EcdsaP256Sha1 => HashFunction::Sha1,
            Self::Rsa2048Sha256
            | Self::RsaPss2048Sha256
            | Self::Rsa3072Sha256
            | Self::RsaPss3072Sha256
            | Self::Rsa4096Sha256
            | Self::RsaPss4096Sha256E3
            | Self::EcdsaP256Sha256
            | Self::EcdsaBrainpoolP256Sha256 => HashFunction::Sha256,
            Self::EcdsaP384Sha384 => HashFunction::Sha384,
            Self::Rsa4096Sha512 => HashFunction::Sha512,
        }
    }

    /// Key size in bits (RSA modulus or EC field size).
    pub fn bits(&self) -> u32 {
        match self {
            Self::Rsa2048Sha256 | Self::Rsa2048Sha1 | Self::RsaPss2048Sha256 => 2048,
            Self::Rsa3072Sha256 | Self::RsaPss3072Sha256 => 3072,
            Self::Rsa4096Sha256 | Self::Rsa4096Sha512 | Self::RsaPss4096Sha256E3 => 4096,
            Self::EcdsaP256Sha256 | Self::EcdsaP256Sha1 | Self::EcdsaBrainpoolP256Sha256 => 256,
            Self::EcdsaP384Sha384 => 384,
        }
    }

    /// RSA exponent or EC curve.
    pub fn key_parameter(&self) -> KeyParameter {
        match self {
            Self::RsaPss4096Sha256E3 => KeyParameter::Exponent(3),
            Self::Rsa2048Sha256
            | Self::Rsa2048Sha1
            | Self::RsaPss2048Sha256
            | Self::Rsa3072Sha256
            | Self::RsaPss3072Sha256
            | Self::Rsa4096Sha256
            | Self::Rsa4096Sha512 => KeyParameter::Exponent(65537),
            Self::EcdsaP256Sha256 | Self::EcdsaP256Sha1 => KeyParameter::Curve(Curve::Secp256r1),
            Self::EcdsaP384Sha384 => KeyParameter::Curve(Curve::Secp384r1),
            Self::EcdsaBrainpoolP256Sha256 => KeyParameter::Curve(Curve::BrainpoolP256r1),
        }
    }

    /// Limb geometry for signature and public-key signals.
    ///
    /// RSA splits the modulus and signature into `k` limbs of 121 bits;
    /// ECDSA splits each of `r`, `s`, `x`, `y` into `k` limbs of 64 bits.
    pub fn limb_geometry(&self) -> LimbGeometry {
        LimbGeometry::covering(self.bits(), self.family().word_bits())
    }

    /// Signature-algorithm index committed into the public-key leaf.
    pub fn index(&self) -> u64 {
        match self {
            Self::Rsa2048Sha256 => 1,
            Self::Rsa2048Sha1 => 2,
            Self::RsaPss2048Sha256 => 3,
            Self::Rsa3072Sha256 => 4,
            Self::RsaPss3072Sha256 => 5,
            Self::Rsa4096Sha256 => 6,
            Self::Rsa4096Sha512 => 7,
            Self::RsaPss4096Sha256E3 => 8,
            Self::EcdsaP256Sha256 => 9,
            Self::EcdsaP256Sha1 => 10,
            Self::EcdsaP384Sha384 => 11,
            Self::EcdsaBrainpoolP256Sha256 => 12,
        }
    }

    /// Canonical key: `{family}_{curve or exponent}_{hash}_{bits}`.
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.family(),
            self.key_parameter(),
            self.hash(),
            self.bits()
        )
    }

    /// Look up a profile by its canonical key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Select the profile matching resolved certificate parameters.
    pub fn resolve(
        family: SignatureFamily,
        parameter: KeyParameter,
        hash: HashFunction,
        bits: u32,
    ) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|p| {
                p.family() == family
                    && p.key_parameter() == parameter
                    && p.hash() == hash
                    && p.bits() == bits
            })
            .ok_or_else(|| {
                ConfigError::UnsupportedAlgorithm(format!("{family}_{parameter}_{hash}_{bits}"))
            })
    }
}

impl std::fmt::Display for AlgorithmProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

impl std::str::FromStr for AlgorithmProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ConfigError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for AlgorithmProfile {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlgorithmProfile> for String {
    fn from(profile: AlgorithmProfile) -> Self {
        profile.key()
    }
}
