//! # Circuit Input Sets
//!
//! The one artifact witness assembly produces: a flat map from signal name
//! to an ordered sequence of decimal strings. The key set and per-key
//! lengths are the compatibility contract with a compiled circuit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zkpp_core::FieldElement;

/// Signal names shared by the circuits.
pub mod names {
    pub const SECRET: &str = "secret";
    pub const DSC_SECRET: &str = "dsc_secret";
    pub const ATTESTATION_ID: &str = "attestation_id";
    pub const PUBKEY_LEAF: &str = "pubkey_leaf";
    pub const DG1: &str = "dg1";
    pub const DG1_HASH_OFFSET: &str = "dg1_hash_offset";
    pub const DG2_HASH: &str = "dg2_hash";
    pub const ECONTENT: &str = "eContent";
    pub const ECONTENT_PADDED_LENGTH: &str = "eContent_padded_length";
    pub const SIGNED_ATTR: &str = "signed_attr";
    pub const SIGNED_ATTR_PADDED_LENGTH: &str = "signed_attr_padded_length";
    pub const SIGNED_ATTR_ECONTENT_HASH_OFFSET: &str = "signed_attr_econtent_hash_offset";
    pub const SIGNATURE: &str = "signature";
    pub const PUBKEY: &str = "pubKey";
    pub const MERKLE_ROOT: &str = "merkle_root";
    pub const MERKLETREE_SIZE: &str = "merkletree_size";
    pub const PATH: &str = "path";
    pub const SIBLINGS: &str = "siblings";
    pub const SELECTOR_MODE: &str = "selector_mode";
    pub const SELECTOR_DG1: &str = "selector_dg1";
    pub const SELECTOR_OLDER_THAN: &str = "selector_older_than";
    pub const SELECTOR_OFAC: &str = "selector_ofac";
    pub const SCOPE: &str = "scope";
    pub const CURRENT_DATE: &str = "current_date";
    pub const MAJORITY: &str = "majority";
    pub const USER_IDENTIFIER: &str = "user_identifier";
    pub const SMT_LEAF_VALUE: &str = "smt_leaf_value";
    pub const SMT_ROOT: &str = "smt_root";
    pub const SMT_SIBLINGS: &str = "smt_siblings";
    pub const HOST_COUNTRY: &str = "hostCountry";
    pub const FORBIDDEN_COUNTRIES_LIST: &str = "forbidden_countries_list";
}

/// Named circuit signals, each an ordered list of decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitInputSet(BTreeMap<String, Vec<String>>);

impl CircuitInputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to a single field element.
    pub fn set_field(&mut self, name: &str, value: &FieldElement) {
        self.0.insert(name.to_string(), vec![value.to_decimal()]);
    }

    /// Set `name` to a sequence of field elements.
    pub fn set_fields<'a>(&mut self, name: &str, values: impl IntoIterator<Item = &'a FieldElement>) {
        self.0
            .insert(name.to_string(), values.into_iter().map(FieldElement::to_decimal).collect());
    }

    /// Set `name` to a sequence of small integers.
    pub fn set_u64s(&mut self, name: &str, values: impl IntoIterator<Item = u64>) {
        self.0
            .insert(name.to_string(), values.into_iter().map(|v| v.to_string()).collect());
    }

    /// Set `name` to one value per byte.
    pub fn set_bytes(&mut self, name: &str, bytes: &[u8]) {
        self.set_u64s(name, bytes.iter().map(|b| u64::from(*b)));
    }

    /// Set `name` to already-rendered decimal strings.
    pub fn set_decimals(&mut self, name: &str, values: Vec<String>) {
        self.0.insert(name.to_string(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Signal names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of signals.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of values across all signals.
    pub fn value_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Render as a flat JSON object.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
