//! Registration-side helpers: building an identity tree that holds a
//! document's commitment, for tests and local tooling.

use zkpp_core::{DocumentRecord, FieldElement, ZkppError};
use zkpp_tree::{IncrementalTree, LeanImt};

use crate::leaves::document_commitment;

/// A one-leaf identity tree holding the commitment for `document`.
pub fn identity_tree_with_commitment(
    secret: &FieldElement,
    attestation_id: &FieldElement,
    document: &DocumentRecord,
) -> Result<LeanImt, ZkppError> {
    let commitment = document_commitment(secret, attestation_id, document)?;
    let mut tree = LeanImt::new();
    tree.insert(commitment)?;
    tracing::debug!(commitment = %commitment, "identity tree built");
    Ok(tree)
}
