//! # Circuit Capabilities
//!
//! An immutable record of what one compiled circuit version accepts: tree
//! depths, host country, forbidden-country slots, and the padded-length
//! ceilings of the `eContent` and `signedAttr` input arrays for each
//! algorithm profile.
//!
//! The record is handed to the assembler at construction. Distinct circuit
//! versions are distinct records, so they can coexist in one process.
//!
//! ## Invariant
//!
//! A profile without registered ceilings is unsupported. Lookups fail with
//! [`ConfigError::CapacityNotRegistered`]; there is no fallback ceiling.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithm::{AlgorithmProfile, HashFunction};
use crate::error::ConfigError;
use crate::identifier::UserIdType;

/// Padded-length ceilings for one profile, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitCapacity {
    /// Capacity of the `eContent` input array.
    pub econtent: usize,
    /// Capacity of the `signed_attr` input array.
    pub signed_attr: usize,
}

impl CircuitCapacity {
    /// Ceilings compiled into the reference circuits for a hash function.
    pub fn reference(hash: HashFunction) -> Self {
        match hash {
            HashFunction::Sha1 | HashFunction::Sha256 => Self {
                econtent: 384,
                signed_attr: 128,
            },
            HashFunction::Sha384 | HashFunction::Sha512 => Self {
                econtent: 768,
                signed_attr: 256,
            },
        }
    }
}

/// Capability record for one circuit version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitCapabilities {
    /// Maximum depth of the identity tree proof arrays.
    #[serde(default = "default_identity_tree_depth")]
    pub identity_tree_depth: usize,

    /// Depth of the sparse denylist tree.
    #[serde(default = "default_sparse_tree_depth")]
    pub sparse_tree_depth: usize,

    /// Host country for the country-verification circuit.
    #[serde(default = "default_host_country")]
    pub host_country: String,

    /// Slots in the forbidden-countries signal.
    #[serde(default = "default_max_forbidden_countries")]
    pub max_forbidden_countries: usize,

    /// User identifier encoding used when a request does not name one.
    #[serde(default)]
    pub default_user_id_type: UserIdType,

    /// Padded-length ceilings keyed by profile.
    #[serde(default = "default_capacities")]
    pub capacities: BTreeMap<AlgorithmProfile, CircuitCapacity>,
}

fn default_identity_tree_depth() -> usize {
    16
}

fn default_sparse_tree_depth() -> usize {
    256
}

fn default_host_country() -> String {
    "USA".to_string()
}

fn default_max_forbidden_countries() -> usize {
    20
}

fn default_capacities() -> BTreeMap<AlgorithmProfile, CircuitCapacity> {
    AlgorithmProfile::ALL
        .into_iter()
        .map(|p| (p, CircuitCapacity::reference(p.hash())))
        .collect()
}

impl Default for CircuitCapabilities {
    fn default() -> Self {
        Self {
            identity_tree_depth: default_identity_tree_depth(),
            sparse_tree_depth: default_sparse_tree_depth(),
            host_country: default_host_country(),
            max_forbidden_countries: default_max_forbidden_countries(),
            default_user_id_type: UserIdType::default(),
            capacities: default_capacities(),
        }
    }
}

impl CircuitCapabilities {
    /// Deepest identity tree a proof path can address.
    pub const MAX_IDENTITY_DEPTH: usize = 32;

    /// Deepest sparse tree: one level per key bit.
    pub const MAX_SPARSE_DEPTH: usize = 256;

    /// Registered ceilings for `profile`.
    pub fn capacity_for(&self, profile: AlgorithmProfile) -> Result<CircuitCapacity, ConfigError> {
        self.capacities
            .get(&profile)
            .copied()
            .ok_or_else(|| ConfigError::CapacityNotRegistered(profile.key()))
    }

    /// Return a copy with `capacity` registered for `profile`.
    pub fn with_capacity(mut self, profile: AlgorithmProfile, capacity: CircuitCapacity) -> Self {
        self.capacities.insert(profile, capacity);
        self
    }

    /// Return a copy keeping only the ceilings registered for `profiles`.
    pub fn restricted_to(mut self, profiles: &[AlgorithmProfile]) -> Self {
        self.capacities.retain(|p, _| profiles.contains(p));
        self
    }

    /// Check structural consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity_tree_depth == 0 || self.identity_tree_depth > Self::MAX_IDENTITY_DEPTH {
            return Err(ConfigError::InvalidDepth {
                tree: "identity",
                depth: self.identity_tree_depth,
            });
        }
        if self.sparse_tree_depth == 0 || self.sparse_tree_depth > Self::MAX_SPARSE_DEPTH {
            return Err(ConfigError::InvalidDepth {
                tree: "sparse",
                depth: self.sparse_tree_depth,
            });
        }
        if self.host_country.len() != 3 || !self.host_country.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidHostCountry(self.host_country.clone()));
        }
        for (profile, capacity) in &self.capacities {
            let block = profile.hash().block_size();
            for (buffer, ceiling) in [
                ("eContent", capacity.econtent),
                ("signedAttr", capacity.signed_attr),
            ] {
                if ceiling == 0 || ceiling % block != 0 {
                    return Err(ConfigError::MisalignedCapacity {
                        profile: profile.key(),
                        buffer,
                        ceiling,
                        block,
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse and validate from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let caps: Self = serde_yaml::from_str(yaml)?;
        caps.validate()?;
        Ok(caps)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registers_every_profile() {
        let caps = CircuitCapabilities::default();
        caps.validate().unwrap();
        for p in AlgorithmProfile::ALL {
            assert!(caps.capacity_for(p).is_ok(), "{p}");
        }
        assert_eq!(
            caps.capacity_for(AlgorithmProfile::Rsa2048Sha256).unwrap(),
            CircuitCapacity { econtent: 384, signed_attr: 128 }
        );
        assert_eq!(
            caps.capacity_for(AlgorithmProfile::EcdsaP384Sha384).unwrap(),
            CircuitCapacity { econtent: 768, signed_attr: 256 }
        );
    }

    #[test]
    fn test_unregistered_profile_is_fatal() {
        let caps = CircuitCapabilities::default().restricted_to(&[AlgorithmProfile::Rsa2048Sha256]);
        let err = caps.capacity_for(AlgorithmProfile::EcdsaP256Sha256).unwrap_err();
        assert!(
            matches!(err, ConfigError::CapacityNotRegistered(ref k) if k == "ecdsa_secp256r1_sha256_256")
        );
    }

    #[test]
    fn test_yaml_defaults_fill_missing_fields() {
        let caps = CircuitCapabilities::from_yaml_str("host_country: FRA\n").unwrap();
        assert_eq!(caps.host_country, "FRA");
        assert_eq!(caps.identity_tree_depth, 16);
        assert_eq!(caps.sparse_tree_depth, 256);
        assert_eq!(caps.max_forbidden_countries, 20);
        assert_eq!(caps.default_user_id_type, UserIdType::Uuid);
        assert_eq!(caps.capacities.len(), AlgorithmProfile::ALL.len());
    }

    #[test]
    fn test_yaml_capacity_table_replaces_defaults() {
        let yaml = "\
capacities:
  rsa_65537_sha256_2048:
    econtent: 448
    signed_attr: 192
";
        let caps = CircuitCapabilities::from_yaml_str(yaml).unwrap();
        assert_eq!(caps.capacities.len(), 1);
        assert_eq!(
            caps.capacity_for(AlgorithmProfile::Rsa2048Sha256).unwrap().econtent,
            448
        );
        assert!(caps.capacity_for(AlgorithmProfile::Rsa2048Sha1).is_err());
    }

    #[test]
    fn test_misaligned_ceiling_rejected() {
        let yaml = "\
capacities:
  ecdsa_secp384r1_sha384_384:
    econtent: 384
    signed_attr: 200
";
        let err = CircuitCapabilities::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MisalignedCapacity { buffer: "signedAttr", ceiling: 200, block: 128, .. }
        ));
    }

    #[test]
    fn test_unknown_profile_key_rejected() {
        let yaml = "capacities:\n  rsa_3_md5_512:\n    econtent: 64\n    signed_attr: 64\n";
        assert!(matches!(
            CircuitCapabilities::from_yaml_str(yaml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_host_country_and_depth() {
        assert!(matches!(
            CircuitCapabilities::from_yaml_str("host_country: us\n"),
            Err(ConfigError::InvalidHostCountry(_))
        ));
        assert!(matches!(
            CircuitCapabilities::from_yaml_str("identity_tree_depth: 0\n"),
            Err(ConfigError::InvalidDepth { tree: "identity", .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = CircuitCapabilities::load("/nonexistent/capabilities.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
