//! # Input Assembler
//!
//! Turns a document record, verifier parameters and tree handles into the
//! [`CircuitInputSet`] for one of four circuits:
//!
//! - **disclosure**: selective MRZ disclosure against the identity tree.
//! - **denylist**: non-membership of a name, name+DOB or passport-number leaf.
//! - **country**: host/issuer country pair against a sparse tree.
//! - **full proof**: signature verification over padded signed buffers plus
//!   disclosure and a name-level denylist check.
//!
//! ## Design
//!
//! The assembler holds only the immutable [`CircuitCapabilities`] and a
//! [`Clock`]. Trees are borrowed per call, so one assembler serves any
//! number of requests concurrently.
//!
//! ## Invariant
//!
//! Every check that can reject a request runs before the work it guards:
//! proof levels are validated before any tree access, and buffer ceilings are
//! checked before any digest is computed.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use zkpp_core::{
    AlgorithmProfile, CircuitCapabilities, Clock, ConfigError, DocumentError, DocumentRecord,
    FieldElement, FormattedDg1, SignatureFamily, SystemClock, UserIdType, ZkppError,
};
use zkpp_crypto::{digest, locate_digest, pad, EcdsaSignature, LimbVector};
use zkpp_tree::{prove_commitment, prove_sparse, IncrementalTree, ProofLevel, SparseMerkleProof, SparseTree};

use crate::encoding::{
    check_flag, check_selector, encode_country, encode_forbidden_countries, encode_majority,
    encode_scope, encode_user_identifier, SELECTOR_DG1_LEN, SELECTOR_MODE_LEN,
};
use crate::leaves::{commitment, country_leaf, denylist_leaf, name_leaf, pubkey_leaf, pubkey_limbs};
use crate::signals::{names, CircuitInputSet};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Verifier and holder parameters for the disclosure circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureRequest {
    /// Holder secret the commitment was registered with.
    pub secret: FieldElement,
    /// Attestation type identifier.
    pub attestation_id: FieldElement,
    /// One bit per MRZ character to reveal.
    pub selector_dg1: Vec<u8>,
    /// Whether to prove the age threshold.
    pub selector_older_than: u8,
    /// Age threshold, one or two digits.
    pub majority: String,
    /// Application scope.
    pub scope: String,
    /// Identifier of the requesting user.
    pub user_identifier: String,
    /// Representation of `user_identifier`; the configured default if unset.
    #[serde(default)]
    pub user_id_type: Option<UserIdType>,
}

/// Parameters for the full-proof circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveRequest {
    /// Two mode bits selecting the circuit's output commitments.
    pub selector_mode: Vec<u8>,
    /// Holder secret.
    pub secret: FieldElement,
    /// Secret bound to the signer certificate.
    pub dsc_secret: FieldElement,
    /// One bit per MRZ character to reveal.
    pub selector_dg1: Vec<u8>,
    /// Whether to prove the age threshold.
    pub selector_older_than: u8,
    /// Age threshold, one or two digits.
    pub majority: String,
    /// Whether to prove name-level denylist non-membership.
    pub selector_ofac: u8,
    /// Countries the issuer must not be one of.
    #[serde(default)]
    pub forbidden_countries: Vec<String>,
    /// Application scope.
    pub scope: String,
    /// Identifier of the requesting user.
    pub user_identifier: String,
    /// Representation of `user_identifier`; the configured default if unset.
    #[serde(default)]
    pub user_id_type: Option<UserIdType>,
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Builds circuit inputs under one set of circuit capabilities.
pub struct InputAssembler {
    capabilities: CircuitCapabilities,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for InputAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputAssembler")
            .field("capabilities", &self.capabilities)
            .field("today", &self.clock.today())
            .finish()
    }
}

impl InputAssembler {
    /// Validate `capabilities` and build an assembler on the UTC system clock.
    pub fn new(capabilities: CircuitCapabilities) -> Result<Self, ConfigError> {
        capabilities.validate()?;
        Ok(Self {
            capabilities,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the date source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn capabilities(&self) -> &CircuitCapabilities {
        &self.capabilities
    }

    /// Inputs for the disclosure circuit.
    pub fn disclose(
        &self,
        document: &DocumentRecord,
        request: &DisclosureRequest,
        tree: &dyn IncrementalTree,
    ) -> Result<CircuitInputSet, ZkppError> {
        check_selector(names::SELECTOR_DG1, &request.selector_dg1, SELECTOR_DG1_LEN)?;
        check_flag(names::SELECTOR_OLDER_THAN, request.selector_older_than)?;
        let majority = encode_majority(&request.majority)?;
        let scope = encode_scope(&request.scope)?;
        let user_identifier = self.user_identifier(&request.user_identifier, request.user_id_type)?;

        let profile = document.certificate.profile()?;
        let leaf = pubkey_leaf(profile, &document.certificate.public_key)?;
        let dg1 = document.dg1()?;
        let dg2 = document.dg2_hash_padded()?;
        let commitment = commitment(&request.secret, &request.attestation_id, &leaf, &dg1, &dg2)?;

        let (proof, root) = prove_commitment(tree, &commitment, self.capabilities.identity_tree_depth)?;

        let mut set = CircuitInputSet::new();
        set.set_field(names::SECRET, &request.secret);
        set.set_field(names::ATTESTATION_ID, &request.attestation_id);
        set.set_field(names::PUBKEY_LEAF, &leaf);
        set.set_bytes(names::DG1, dg1.as_bytes());
        set.set_bytes(names::DG2_HASH, &dg2);
        set.set_field(names::MERKLE_ROOT, &root);
        set.set_u64s(names::MERKLETREE_SIZE, [proof.depth as u64]);
        set.set_bytes(names::PATH, &proof.path);
        set.set_fields(names::SIBLINGS, &proof.siblings);
        set.set_bytes(names::SELECTOR_DG1, &request.selector_dg1);
        set.set_bytes(names::SELECTOR_OLDER_THAN, &[request.selector_older_than]);
        set.set_field(names::SCOPE, &scope);
        set.set_u64s(names::CURRENT_DATE, self.clock.today().to_signal());
        set.set_bytes(names::MAJORITY, &majority);
        set.set_field(names::USER_IDENTIFIER, &user_identifier);

        tracing::info!(
            circuit = "disclose",
            profile = %profile,
            signals = set.len(),
            values = set.value_count(),
            "circuit inputs assembled"
        );
        Ok(set)
    }

    /// Inputs for the denylist circuit at `proof_level` (1 = name,
    /// 2 = name+DOB, 3 = passport number).
    pub fn ofac(
        &self,
        document: &DocumentRecord,
        tree: &dyn SparseTree,
        proof_level: u8,
    ) -> Result<CircuitInputSet, ZkppError> {
        let level = ProofLevel::try_from(proof_level)?;
        let dg1 = document.dg1()?;
        let leaf = denylist_leaf(level, &dg1)?;
        let proof = prove_sparse(tree, &leaf, self.capabilities.sparse_tree_depth)?;

        let mut set = CircuitInputSet::new();
        set.set_bytes(names::DG1, dg1.as_bytes());
        self.set_sparse_signals(&mut set, &proof)?;

        tracing::info!(
            circuit = "ofac",
            level = level.as_u8(),
            membership = proof.membership,
            signals = set.len(),
            values = set.value_count(),
            "circuit inputs assembled"
        );
        Ok(set)
    }

    /// Inputs for the country circuit, pairing the configured host country
    /// with the document's issuer.
    pub fn country(&self, document: &DocumentRecord, tree: &dyn SparseTree) -> Result<CircuitInputSet, ZkppError> {
        let host = &self.capabilities.host_country;
        let dg1 = document.dg1()?;
        let leaf = country_leaf(host, &dg1)?;
        let proof = prove_sparse(tree, &leaf, self.capabilities.sparse_tree_depth)?;

        let mut set = CircuitInputSet::new();
        set.set_bytes(names::DG1, dg1.as_bytes());
        set.set_bytes(names::HOST_COUNTRY, &encode_country(host)?);
        self.set_sparse_signals(&mut set, &proof)?;

        tracing::info!(
            circuit = "country",
            host_country = %host,
            membership = proof.membership,
            signals = set.len(),
            values = set.value_count(),
            "circuit inputs assembled"
        );
        Ok(set)
    }

    /// Inputs for the full-proof circuit.
    pub fn prove(
        &self,
        document: &DocumentRecord,
        request: &ProveRequest,
        name_tree: &dyn SparseTree,
    ) -> Result<CircuitInputSet, ZkppError> {
        check_selector(names::SELECTOR_MODE, &request.selector_mode, SELECTOR_MODE_LEN)?;
        check_selector(names::SELECTOR_DG1, &request.selector_dg1, SELECTOR_DG1_LEN)?;
        check_flag(names::SELECTOR_OLDER_THAN, request.selector_older_than)?;
        check_flag(names::SELECTOR_OFAC, request.selector_ofac)?;

        let profile = document.certificate.profile()?;
        let capacity = self.capabilities.capacity_for(profile)?;
        let hash = profile.hash();

        // Ceilings before any digest.
        let e_content = pad(hash, &document.e_content, capacity.econtent, "eContent")?;
        let signed_attr = pad(hash, &document.signed_attr, capacity.signed_attr, "signedAttr")?;

        let signature = signature_limbs(profile, &document.encrypted_digest)?;
        let pubkey = pubkey_limbs(profile, &document.certificate.public_key)?;

        let dg1 = document.dg1()?;
        let dg2 = document.dg2_hash_padded()?;
        let dg1_offset = locate_digest("eContent", &document.e_content, &digest(hash, dg1.as_bytes()))?;
        let e_content_offset =
            locate_digest("signedAttr", &document.signed_attr, &digest(hash, &document.e_content))?;

        let majority = encode_majority(&request.majority)?;
        let user_identifier = self.user_identifier(&request.user_identifier, request.user_id_type)?;
        let scope = encode_scope(&request.scope)?;
        let forbidden =
            encode_forbidden_countries(&request.forbidden_countries, self.capabilities.max_forbidden_countries)?;

        let name_proof = self.name_proof(&dg1, name_tree)?;

        let mut set = CircuitInputSet::new();
        set.set_bytes(names::SELECTOR_MODE, &request.selector_mode);
        set.set_bytes(names::DG1, dg1.as_bytes());
        set.set_u64s(names::DG1_HASH_OFFSET, [dg1_offset as u64]);
        set.set_bytes(names::DG2_HASH, &dg2);
        set.set_bytes(names::ECONTENT, &e_content.bytes);
        set.set_u64s(names::ECONTENT_PADDED_LENGTH, [e_content.bit_length]);
        set.set_bytes(names::SIGNED_ATTR, &signed_attr.bytes);
        set.set_u64s(names::SIGNED_ATTR_PADDED_LENGTH, [signed_attr.bit_length]);
        set.set_u64s(names::SIGNED_ATTR_ECONTENT_HASH_OFFSET, [e_content_offset as u64]);
        set.set_fields(names::SIGNATURE, &signature);
        set.set_fields(names::PUBKEY, &pubkey);
        set.set_u64s(names::CURRENT_DATE, self.clock.today().to_signal());
        set.set_bytes(names::SELECTOR_DG1, &request.selector_dg1);
        set.set_bytes(names::SELECTOR_OLDER_THAN, &[request.selector_older_than]);
        set.set_bytes(names::MAJORITY, &majority);
        set.set_field(names::USER_IDENTIFIER, &user_identifier);
        set.set_field(names::SCOPE, &scope);
        set.set_field(names::SECRET, &request.secret);
        set.set_field(names::DSC_SECRET, &request.dsc_secret);
        self.set_sparse_signals(&mut set, &name_proof)?;
        set.set_bytes(names::SELECTOR_OFAC, &[request.selector_ofac]);
        set.set_bytes(names::FORBIDDEN_COUNTRIES_LIST, &forbidden);

        tracing::info!(
            circuit = "prove",
            profile = %profile,
            dg1_hash_offset = dg1_offset,
            econtent_hash_offset = e_content_offset,
            signals = set.len(),
            values = set.value_count(),
            "circuit inputs assembled"
        );
        Ok(set)
    }

    fn name_proof(&self, dg1: &FormattedDg1, tree: &dyn SparseTree) -> Result<SparseMerkleProof, ZkppError> {
        let leaf = name_leaf(dg1)?;
        Ok(prove_sparse(tree, &leaf, self.capabilities.sparse_tree_depth)?)
    }

    fn set_sparse_signals(&self, set: &mut CircuitInputSet, proof: &SparseMerkleProof) -> Result<(), ZkppError> {
        let siblings = proof.padded_siblings(self.capabilities.sparse_tree_depth)?;
        set.set_field(names::SMT_LEAF_VALUE, &proof.closest_leaf);
        set.set_field(names::SMT_ROOT, &proof.root);
        set.set_fields(names::SMT_SIBLINGS, &siblings);
        Ok(())
    }

    fn user_identifier(&self, value: &str, kind: Option<UserIdType>) -> Result<FieldElement, ZkppError> {
        let kind = kind.unwrap_or(self.capabilities.default_user_id_type);
        Ok(encode_user_identifier(value, kind)?)
    }
}

/// Signature limbs in circuit order.
///
/// RSA signatures are the big-endian integer of the signature bytes. ECDSA
/// signatures are DER-decoded and contribute `r` limbs then `s` limbs.
pub fn signature_limbs(profile: AlgorithmProfile, signature: &[u8]) -> Result<Vec<FieldElement>, ZkppError> {
    let geometry = profile.limb_geometry();
    let components = match profile.family() {
        SignatureFamily::Rsa | SignatureFamily::RsaPss => {
            if signature.is_empty() {
                return Err(DocumentError::MalformedSignature("empty RSA signature".to_string()).into());
            }
            vec![BigUint::from_bytes_be(signature)]
        }
        SignatureFamily::Ecdsa => {
            let EcdsaSignature { r, s } = EcdsaSignature::from_der(signature)?;
            vec![r, s]
        }
    };
    let mut out = Vec::with_capacity(components.len() * geometry.word_count);
    for component in &components {
        out.extend(LimbVector::split(component, geometry)?.to_fields()?);
    }
    Ok(out)
}
