//! # Leaf Builders
//!
//! Derives the field elements the trees are keyed by: the identity
//! commitment, the public-key leaf, and the denylist and country leaves over
//! fixed sub-ranges of the formatted DG1 record.
//!
//! ## Invariant
//!
//! Each leaf must be bit-for-bit the value the registration side inserted
//! and the circuit recomputes. Byte strings enter Poseidon either packed
//! 31 bytes per element (`pack_bytes`) or one element per byte, and the
//! choice is fixed per leaf:
//!
//! | leaf            | inputs                                        |
//! |-----------------|-----------------------------------------------|
//! | commitment      | secret, attestation id, pubkey leaf, packed DG1 (3), DG2 digest |
//! | public key      | profile index, chunked hash of key limbs      |
//! | name            | packed name (2)                               |
//! | date of birth   | 6 bytes                                       |
//! | name + DOB      | DOB leaf, name leaf                           |
//! | passport number | 9 bytes                                       |
//! | country         | host country (3 bytes), issuing country (3 bytes) |

use zkpp_core::document::DG2_HASH_LEN;
use zkpp_core::{
    AlgorithmProfile, CryptoError, DocumentRecord, FieldElement, FormattedDg1, PublicKey, ZkppError,
};
use zkpp_crypto::packing::bytes_to_fields;
use zkpp_crypto::{chunked_hash, hash, pack_bytes, LimbVector};
use zkpp_tree::ProofLevel;

use crate::encoding::encode_country;

/// Public-key leaf: `Poseidon(profile index, chunked_hash(key limbs))`.
///
/// RSA keys contribute the modulus limbs, EC keys the `x` limbs followed by
/// the `y` limbs, all in the profile's limb geometry.
pub fn pubkey_leaf(profile: AlgorithmProfile, key: &PublicKey) -> Result<FieldElement, ZkppError> {
    let limbs = pubkey_limbs(profile, key)?;
    let key_digest = chunked_hash(&limbs)?;
    Ok(hash(&[FieldElement::from(profile.index()), key_digest])?)
}

/// Public-key limbs in circuit order.
pub fn pubkey_limbs(profile: AlgorithmProfile, key: &PublicKey) -> Result<Vec<FieldElement>, ZkppError> {
    let geometry = profile.limb_geometry();
    let mut out = Vec::new();
    for component in key.components()? {
        out.extend(LimbVector::split(&component, geometry)?.to_fields()?);
    }
    Ok(out)
}

/// Digest of the DG2 hash zero-padded to 64 bytes.
pub fn dg2_digest(dg2_padded: &[u8; DG2_HASH_LEN]) -> Result<FieldElement, CryptoError> {
    chunked_hash(&pack_bytes(dg2_padded))
}

/// Identity commitment binding a secret to one document.
pub fn commitment(
    secret: &FieldElement,
    attestation_id: &FieldElement,
    pubkey_leaf: &FieldElement,
    dg1: &FormattedDg1,
    dg2_padded: &[u8; DG2_HASH_LEN],
) -> Result<FieldElement, CryptoError> {
    let mut inputs = vec![*secret, *attestation_id, *pubkey_leaf];
    inputs.extend(pack_bytes(dg1.as_bytes()));
    inputs.push(dg2_digest(dg2_padded)?);
    hash(&inputs)
}

/// Commitment for `document`, deriving its profile and public-key leaf.
pub fn document_commitment(
    secret: &FieldElement,
    attestation_id: &FieldElement,
    document: &DocumentRecord,
) -> Result<FieldElement, ZkppError> {
    let profile = document.certificate.profile()?;
    let leaf = pubkey_leaf(profile, &document.certificate.public_key)?;
    let dg1 = document.dg1()?;
    let dg2 = document.dg2_hash_padded()?;
    Ok(commitment(secret, attestation_id, &leaf, &dg1, &dg2)?)
}

pub fn name_leaf(dg1: &FormattedDg1) -> Result<FieldElement, CryptoError> {
    hash(&pack_bytes(dg1.name()))
}

pub fn dob_leaf(dg1: &FormattedDg1) -> Result<FieldElement, CryptoError> {
    hash(&bytes_to_fields(dg1.date_of_birth()))
}

pub fn name_dob_leaf(dg1: &FormattedDg1) -> Result<FieldElement, CryptoError> {
    hash(&[dob_leaf(dg1)?, name_leaf(dg1)?])
}

pub fn passport_number_leaf(dg1: &FormattedDg1) -> Result<FieldElement, CryptoError> {
    hash(&bytes_to_fields(dg1.passport_number()))
}

/// Country pair leaf for `host_country` and the document's issuer.
pub fn country_leaf(host_country: &str, dg1: &FormattedDg1) -> Result<FieldElement, ZkppError> {
    let mut bytes = encode_country(host_country)?.to_vec();
    bytes.extend_from_slice(dg1.issuing_country());
    Ok(hash(&bytes_to_fields(&bytes))?)
}

/// Denylist leaf at `level`.
pub fn denylist_leaf(level: ProofLevel, dg1: &FormattedDg1) -> Result<FieldElement, CryptoError> {
    match level {
        ProofLevel::Name => name_leaf(dg1),
        ProofLevel::NameDob => name_dob_leaf(dg1),
        ProofLevel::PassportNumber => passport_number_leaf(dg1),
    }
}
