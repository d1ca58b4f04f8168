//! # Pipeline Integration Tests
//!
//! Runs the four assembly pipelines end to end over the ICAO 9303 specimen
//! passport (ERIKSSON, ANNA MARIA). The signed buffers are synthetic but
//! structurally faithful: `eContent` embeds the SHA-256 of the formatted DG1
//! record and `signedAttr` embeds the SHA-256 of `eContent`, at fixed offsets.

use std::sync::atomic::{AtomicUsize, Ordering};

use zkpp_core::{
    AlgorithmProfile, CertificateParams, CircuitCapabilities, CircuitDate, ConfigError, Curve,
    DocumentError, DocumentRecord, FieldElement, FixedClock, FormattedDg1, HashFunction, PublicKey,
    SignatureFamily, TreeError, UserIdType, ZkppError,
};
use zkpp_crypto::digest;
use zkpp_inputs::leaves::{country_leaf, name_leaf, passport_number_leaf};
use zkpp_inputs::signals::names;
use zkpp_inputs::{identity_tree_with_commitment, CircuitInputSet, DisclosureRequest, InputAssembler, ProveRequest};
use zkpp_tree::{IncrementalTree, LeanImt, SparseMerkleProof, SparseMerkleTree, SparseTree};

const SPECIMEN_MRZ: &str =
    "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<L898902C36UTO7408122F1204159ZE184226B<<<<<10";

const DG1_HASH_OFFSET: usize = 27;
const ECONTENT_HASH_OFFSET: usize = 42;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn dg1() -> FormattedDg1 {
    FormattedDg1::from_mrz(SPECIMEN_MRZ).expect("specimen MRZ is valid")
}

/// `eContent` of `len` bytes with the DG1 digest at [`DG1_HASH_OFFSET`].
fn e_content(len: usize) -> Vec<u8> {
    let dg1_hash = digest(HashFunction::Sha256, dg1().as_bytes());
    let mut out: Vec<u8> = (0..len).map(|i| (i % 200) as u8 + 1).collect();
    out[DG1_HASH_OFFSET..DG1_HASH_OFFSET + 32].copy_from_slice(&dg1_hash);
    out
}

/// `signedAttr` with the `eContent` digest at [`ECONTENT_HASH_OFFSET`].
fn signed_attr(e_content: &[u8]) -> Vec<u8> {
    let mut out = vec![0x31, 0x66, 0x30, 0x15, 0x06, 0x09];
    out.resize(ECONTENT_HASH_OFFSET, 0x2a);
    out.extend_from_slice(&digest(HashFunction::Sha256, e_content));
    out.extend_from_slice(&[0x04, 0x00]);
    out
}

fn rsa_document(e_content_len: usize) -> DocumentRecord {
    let e_content = e_content(e_content_len);
    DocumentRecord {
        mrz: SPECIMEN_MRZ.to_string(),
        dg2_hash: (0..32).collect(),
        signed_attr: signed_attr(&e_content),
        e_content,
        encrypted_digest: vec![0x5a; 256],
        certificate: CertificateParams {
            signature_algorithm: SignatureFamily::Rsa,
            hash_function: HashFunction::Sha256,
            bits: 2048,
            public_key: PublicKey::Rsa {
                modulus: format!("c{}", "5".repeat(511)),
                exponent: 65537,
            },
        },
    }
}

fn ecdsa_document() -> DocumentRecord {
    let e_content = e_content(120);
    let mut der = vec![0x30, 0x44, 0x02, 0x20];
    der.extend_from_slice(&[0x11; 32]);
    der.extend_from_slice(&[0x02, 0x20]);
    der.extend_from_slice(&[0x22; 32]);
    DocumentRecord {
        mrz: SPECIMEN_MRZ.to_string(),
        dg2_hash: vec![9; 32],
        signed_attr: signed_attr(&e_content),
        e_content,
        encrypted_digest: der,
        certificate: CertificateParams {
            signature_algorithm: SignatureFamily::Ecdsa,
            hash_function: HashFunction::Sha256,
            bits: 256,
            public_key: PublicKey::Ec {
                curve: Curve::Secp256r1,
                x: "6b".repeat(32),
                y: "4f".repeat(32),
            },
        },
    }
}

fn assembler() -> InputAssembler {
    InputAssembler::new(CircuitCapabilities::default())
        .expect("default capabilities are valid")
        .with_clock(FixedClock(CircuitDate::from_ymd(2024, 7, 9).expect("valid date")))
}

fn disclosure_request(secret: u64, attestation_id: u64) -> DisclosureRequest {
    let mut selector_dg1 = vec![0u8; 88];
    selector_dg1[5..44].fill(1);
    DisclosureRequest {
        secret: FieldElement::from(secret),
        attestation_id: FieldElement::from(attestation_id),
        selector_dg1,
        selector_older_than: 1,
        majority: "18".to_string(),
        scope: "@spaceShip".to_string(),
        user_identifier: "e9f84b67-2b0c-4e2f-9f3a-6c9c2e0c7a11".to_string(),
        user_id_type: None,
    }
}

fn prove_request() -> ProveRequest {
    ProveRequest {
        selector_mode: vec![1, 1],
        secret: FieldElement::from(42u64),
        dsc_secret: FieldElement::from(43u64),
        selector_dg1: vec![1; 88],
        selector_older_than: 1,
        majority: "7".to_string(),
        selector_ofac: 1,
        forbidden_countries: vec!["AFG".to_string(), "PRK".to_string()],
        scope: "@spaceShip".to_string(),
        user_identifier: "0xdeadbeef".to_string(),
        user_id_type: Some(UserIdType::Hex),
    }
}

fn values(set: &CircuitInputSet, name: &str) -> Vec<String> {
    set.get(name)
        .unwrap_or_else(|| panic!("signal {name} missing"))
        .to_vec()
}

fn decimals(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|b| b.to_string()).collect()
}

/// Sparse tree that counts every call, for asserting that rejected requests
/// never reach the tree.
struct CountingTree {
    inner: SparseMerkleTree,
    calls: AtomicUsize,
}

impl SparseTree for CountingTree {
    fn root(&self) -> FieldElement {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.root()
    }

    fn prove_at(&self, leaf: &FieldElement) -> Result<SparseMerkleProof, TreeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.prove_at(leaf)
    }
}

// ---------------------------------------------------------------------------
// Disclosure
// ---------------------------------------------------------------------------

#[test]
fn test_disclose_single_commitment_tree() {
    let doc = rsa_document(200);
    let tree = identity_tree_with_commitment(&FieldElement::from(7u64), &FieldElement::from(1u64), &doc)
        .expect("identity tree");
    assert_eq!(tree.len(), 1);

    let set = assembler()
        .disclose(&doc, &disclosure_request(7, 1), &tree)
        .expect("disclosure inputs");

    assert_eq!(values(&set, names::SECRET), vec!["7"]);
    assert_eq!(values(&set, names::ATTESTATION_ID), vec!["1"]);
    assert_eq!(values(&set, names::MERKLETREE_SIZE), vec!["0"]);
    assert_eq!(values(&set, names::PATH), vec!["0"; 16]);
    assert_eq!(values(&set, names::SIBLINGS), vec!["0"; 16]);

    // A one-leaf tree's root is the commitment itself.
    let root = values(&set, names::MERKLE_ROOT);
    assert_eq!(root, vec![tree.leaves()[0].to_decimal()]);
}

#[test]
fn test_disclose_signal_shapes() {
    let doc = rsa_document(200);
    let secret = FieldElement::from(7u64);
    let one = FieldElement::from(1u64);
    let commitment = identity_tree_with_commitment(&secret, &one, &doc).expect("tree").leaves()[0];
    let others = (100..105u64).map(FieldElement::from);
    let tree = LeanImt::from_leaves(others.chain(std::iter::once(commitment))).expect("tree");

    let set = assembler()
        .disclose(&doc, &disclosure_request(7, 1), &tree)
        .expect("disclosure inputs");

    let expected: Vec<&str> = vec![
        names::ATTESTATION_ID,
        names::CURRENT_DATE,
        names::DG1,
        names::DG2_HASH,
        names::MAJORITY,
        names::MERKLE_ROOT,
        names::MERKLETREE_SIZE,
        names::PATH,
        names::PUBKEY_LEAF,
        names::SCOPE,
        names::SECRET,
        names::SELECTOR_DG1,
        names::SELECTOR_OLDER_THAN,
        names::SIBLINGS,
        names::USER_IDENTIFIER,
    ];
    assert_eq!(set.names().collect::<Vec<_>>(), expected);

    assert_eq!(values(&set, names::DG1), decimals(dg1().as_bytes()));
    assert_eq!(values(&set, names::DG2_HASH).len(), 64);
    assert_eq!(values(&set, names::SELECTOR_DG1).len(), 88);
    assert_eq!(values(&set, names::CURRENT_DATE), vec!["24", "7", "9"]);
    assert_eq!(values(&set, names::MAJORITY), vec!["49", "56"]);
    // Index 5 of 6 has no sibling at level 1, so only two levels are used.
    assert_eq!(values(&set, names::MERKLETREE_SIZE), vec!["2"]);
    assert_eq!(values(&set, names::PATH)[..2], ["1", "1"]);
    assert_eq!(values(&set, names::MERKLE_ROOT), vec![tree.root().expect("root").to_decimal()]);
    assert_eq!(values(&set, names::SIBLINGS).len(), 16);
    assert_eq!(values(&set, names::PATH).len(), 16);
}

#[test]
fn test_disclose_unknown_commitment() {
    let doc = rsa_document(200);
    let tree = identity_tree_with_commitment(&FieldElement::from(7u64), &FieldElement::from(1u64), &doc)
        .expect("tree");
    let err = assembler()
        .disclose(&doc, &disclosure_request(8, 1), &tree)
        .unwrap_err();
    assert!(matches!(err, ZkppError::Tree(TreeError::CommitmentNotFound { .. })));
}

#[test]
fn test_disclose_rejects_bad_selector() {
    let doc = rsa_document(200);
    let tree = LeanImt::new();
    let mut request = disclosure_request(7, 1);
    request.selector_dg1.pop();
    let err = assembler().disclose(&doc, &request, &tree).unwrap_err();
    assert!(matches!(err, ZkppError::Encoding(_)));
}

// ---------------------------------------------------------------------------
// Denylist and country
// ---------------------------------------------------------------------------

#[test]
fn test_ofac_invalid_level_never_touches_tree() {
    let tree = CountingTree {
        inner: SparseMerkleTree::new(256),
        calls: AtomicUsize::new(0),
    };
    for level in [0u8, 4] {
        let err = assembler().ofac(&rsa_document(200), &tree, level).unwrap_err();
        assert!(matches!(err, ZkppError::Tree(TreeError::InvalidProofLevel(l)) if l == level));
    }
    assert_eq!(tree.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_ofac_passport_number_membership() {
    let listed = passport_number_leaf(&dg1()).expect("leaf");
    let keys = [FieldElement::from(3u64), listed, FieldElement::from(1000u64)];
    let tree = SparseMerkleTree::from_keys(256, keys).expect("tree");

    let set = assembler().ofac(&rsa_document(200), &tree, 3).expect("ofac inputs");
    assert_eq!(values(&set, names::SMT_LEAF_VALUE), vec![listed.to_decimal()]);
    assert_eq!(values(&set, names::SMT_ROOT), vec![tree.root().to_decimal()]);
    assert_eq!(values(&set, names::SMT_SIBLINGS).len(), 256);
    assert_eq!(set.len(), 4);
}

#[test]
fn test_ofac_name_non_membership() {
    let tree = SparseMerkleTree::from_keys(256, (1..=20u64).map(FieldElement::from)).expect("tree");
    let set = assembler().ofac(&rsa_document(200), &tree, 1).expect("ofac inputs");

    let leaf = name_leaf(&dg1()).expect("leaf");
    let proof = tree.prove_at(&leaf).expect("proof");
    assert!(!proof.membership);
    assert!(proof.verify());
    assert_eq!(values(&set, names::SMT_LEAF_VALUE), vec![proof.closest_leaf.to_decimal()]);
}

#[test]
fn test_country_uses_configured_host() {
    let usa = country_leaf("USA", &dg1()).expect("leaf");
    let tree = SparseMerkleTree::from_keys(256, [usa]).expect("tree");

    let set = assembler().country(&rsa_document(200), &tree).expect("country inputs");
    assert_eq!(values(&set, names::HOST_COUNTRY), vec!["85", "83", "65"]);
    assert_eq!(values(&set, names::SMT_LEAF_VALUE), vec![usa.to_decimal()]);

    let caps = CircuitCapabilities {
        host_country: "FRA".to_string(),
        ..CircuitCapabilities::default()
    };
    let french = InputAssembler::new(caps).expect("valid capabilities");
    let set = french.country(&rsa_document(200), &tree).expect("country inputs");
    assert_eq!(values(&set, names::HOST_COUNTRY), vec!["70", "82", "65"]);
    assert_ne!(values(&set, names::SMT_LEAF_VALUE), vec![country_leaf("FRA", &dg1()).expect("leaf").to_decimal()]);
}

// ---------------------------------------------------------------------------
// Full proof
// ---------------------------------------------------------------------------

#[test]
fn test_prove_rsa_signals() {
    let doc = rsa_document(200);
    let name_tree = SparseMerkleTree::from_keys(256, (1..=8u64).map(FieldElement::from)).expect("tree");
    let set = assembler().prove(&doc, &prove_request(), &name_tree).expect("prove inputs");

    assert_eq!(values(&set, names::DG1_HASH_OFFSET), vec![DG1_HASH_OFFSET.to_string()]);
    assert_eq!(
        values(&set, names::SIGNED_ATTR_ECONTENT_HASH_OFFSET),
        vec![ECONTENT_HASH_OFFSET.to_string()]
    );
    assert_eq!(values(&set, names::ECONTENT).len(), 384);
    assert_eq!(values(&set, names::ECONTENT_PADDED_LENGTH), vec!["1600"]);
    assert_eq!(values(&set, names::SIGNED_ATTR).len(), 128);
    assert_eq!(
        values(&set, names::SIGNED_ATTR_PADDED_LENGTH),
        vec![(doc.signed_attr.len() * 8).to_string()]
    );
    assert_eq!(values(&set, names::SIGNATURE).len(), 17);
    assert_eq!(values(&set, names::PUBKEY).len(), 17);
    assert_eq!(values(&set, names::SELECTOR_MODE), vec!["1", "1"]);
    assert_eq!(values(&set, names::MAJORITY), vec!["48", "55"]);
    assert_eq!(values(&set, names::USER_IDENTIFIER), vec![0xdeadbeefu64.to_string()]);
    assert_eq!(values(&set, names::SECRET), vec!["42"]);
    assert_eq!(values(&set, names::DSC_SECRET), vec!["43"]);
    assert_eq!(values(&set, names::SMT_SIBLINGS).len(), 256);
    assert_eq!(values(&set, names::SELECTOR_OFAC), vec!["1"]);

    let forbidden = values(&set, names::FORBIDDEN_COUNTRIES_LIST);
    assert_eq!(forbidden.len(), 60);
    assert_eq!(&forbidden[..6], &decimals(b"AFGPRK")[..]);
    assert!(forbidden[6..].iter().all(|v| v == "0"));

    // Padding marker directly after the real message.
    assert_eq!(values(&set, names::ECONTENT)[200], "128");
}

#[test]
fn test_prove_oversized_econtent_rejected() {
    let doc = rsa_document(400);
    let name_tree = SparseMerkleTree::new(256);
    let err = assembler().prove(&doc, &prove_request(), &name_tree).unwrap_err();
    match err {
        ZkppError::Document(DocumentError::UnsupportedLength { buffer, length, ceiling }) => {
            assert_eq!(buffer, "eContent");
            assert_eq!(length, 400);
            assert_eq!(ceiling, 384);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_prove_missing_dg1_digest() {
    let mut doc = rsa_document(200);
    doc.e_content[DG1_HASH_OFFSET] ^= 0xff;
    doc.signed_attr = signed_attr(&doc.e_content);
    let err = assembler()
        .prove(&doc, &prove_request(), &SparseMerkleTree::new(256))
        .unwrap_err();
    let expected_hex = hex::encode(digest(HashFunction::Sha256, dg1().as_bytes()));
    match err {
        ZkppError::Document(DocumentError::DigestNotEmbedded { container, digest_hex }) => {
            assert_eq!(container, "eContent");
            assert_eq!(digest_hex, expected_hex);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_prove_ecdsa_limbs() {
    let doc = ecdsa_document();
    let set = assembler()
        .prove(&doc, &prove_request(), &SparseMerkleTree::new(256))
        .expect("prove inputs");
    let signature = values(&set, names::SIGNATURE);
    let pubkey = values(&set, names::PUBKEY);
    assert_eq!(signature.len(), 8);
    assert_eq!(pubkey.len(), 8);
    assert_eq!(signature[0], u64::from_be_bytes([0x11; 8]).to_string());
    assert_eq!(signature[4], u64::from_be_bytes([0x22; 8]).to_string());
    assert_eq!(pubkey[0], u64::from_be_bytes([0x6b; 8]).to_string());
    assert_eq!(pubkey[4], u64::from_be_bytes([0x4f; 8]).to_string());
}

#[test]
fn test_prove_requires_registered_capacity() {
    let caps = CircuitCapabilities::default().restricted_to(&[AlgorithmProfile::EcdsaP256Sha256]);
    let assembler = InputAssembler::new(caps).expect("valid capabilities");
    let err = assembler
        .prove(&rsa_document(200), &prove_request(), &SparseMerkleTree::new(256))
        .unwrap_err();
    assert!(matches!(err, ZkppError::Config(ConfigError::CapacityNotRegistered(_))));
}

#[test]
fn test_prove_rejects_too_many_countries() {
    let mut request = prove_request();
    request.forbidden_countries = vec!["AAA".to_string(); 21];
    let err = assembler()
        .prove(&rsa_document(200), &request, &SparseMerkleTree::new(256))
        .unwrap_err();
    assert!(matches!(err, ZkppError::Encoding(_)));
}
