//! # Digest Offsets
//!
//! The circuit checks that a digest sits inside its container by position,
//! not by search. The witness therefore carries the byte offset of the DG1
//! hash inside `eContent`, and of the `eContent` hash inside `signedAttr`.

use zkpp_core::DocumentError;

/// First position at which `needle` occurs in `haystack`.
///
/// Byte-exact with no wraparound. An empty needle matches at `0`.
pub fn find_subarray(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Offset of `digest` inside `container`, or
/// [`DocumentError::DigestNotEmbedded`] carrying the digest in hex.
pub fn locate_digest(
    container_name: &'static str,
    container: &[u8],
    digest: &[u8],
) -> Result<usize, DocumentError> {
    let offset = find_subarray(container, digest).ok_or_else(|| DocumentError::DigestNotEmbedded {
        container: container_name,
        digest_hex: hex::encode(digest),
    })?;
    tracing::debug!(container = container_name, offset, "located embedded digest");
    Ok(offset)
}
