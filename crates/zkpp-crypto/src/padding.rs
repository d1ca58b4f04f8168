//! # Hash Padding
//!
//! SHA-1 and SHA-2 inside a circuit run over a fixed-size byte array. The
//! witness supplies the message already padded (`0x80`, zeros, big-endian
//! bit length) and then zero-extended to the circuit's capacity. The circuit
//! learns where the real message ends from the reported bit length.
//!
//! ## Invariant
//!
//! A message whose padding would not fit the capacity is rejected with
//! [`DocumentError::UnsupportedLength`]. The circuit array cannot grow, so
//! there is no partial or truncated output.

use zkpp_core::{DocumentError, HashFunction};

/// A message padded for in-circuit hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedMessage {
    /// Exactly `max_padded_len` bytes.
    pub bytes: Vec<u8>,
    /// Bit length of the original message.
    pub bit_length: u64,
    /// Length of the real padded message before zero extension; a multiple
    /// of the hash block size.
    pub padded_len: usize,
}

/// Pad `buffer` for `hash` and zero-extend to `max_padded_len`.
///
/// `label` names the buffer in the error.
pub fn pad(
    hash: HashFunction,
    buffer: &[u8],
    max_padded_len: usize,
    label: &'static str,
) -> Result<PaddedMessage, DocumentError> {
    let block = hash.block_size();
    let length_field = hash.length_field_size();
    let padded_len = (buffer.len() + hash.padding_overhead()).div_ceil(block) * block;

    if padded_len > max_padded_len {
        return Err(DocumentError::UnsupportedLength {
            buffer: label,
            length: buffer.len(),
            ceiling: max_padded_len,
        });
    }

    let bit_length = (buffer.len() as u64) * 8;
    let mut bytes = Vec::with_capacity(max_padded_len);
    bytes.extend_from_slice(buffer);
    bytes.push(0x80);
    bytes.resize(padded_len - length_field, 0);
    let mut length_bytes = vec![0u8; length_field];
    length_bytes[length_field - 8..].copy_from_slice(&bit_length.to_be_bytes());
    bytes.extend_from_slice(&length_bytes);
    bytes.resize(max_padded_len, 0);

    tracing::debug!(
        buffer = label,
        hash = %hash,
        length = buffer.len(),
        padded_len,
        capacity = max_padded_len,
        "padded message"
    );

    Ok(PaddedMessage {
        bytes,
        bit_length,
        padded_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_abc_layout() {
        let p = pad(HashFunction::Sha256, b"abc", 128, "test").unwrap();
        assert_eq!(p.bytes.len(), 128);
        assert_eq!(p.padded_len, 64);
        assert_eq!(p.bit_length, 24);
        assert_eq!(&p.bytes[..3], b"abc");
        assert_eq!(p.bytes[3], 0x80);
        assert!(p.bytes[4..56].iter().all(|b| *b == 0));
        assert_eq!(&p.bytes[56..64], &24u64.to_be_bytes());
        assert!(p.bytes[64..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_sha512_uses_sixteen_byte_length() {
        let p = pad(HashFunction::Sha512, &[0xAA; 10], 256, "test").unwrap();
        assert_eq!(p.padded_len, 128);
        assert!(p.bytes[111..120].iter().all(|b| *b == 0));
        assert_eq!(&p.bytes[120..128], &80u64.to_be_bytes());
    }

    #[test]
    fn test_exact_block_boundary() {
        // 55 bytes + 0x80 + 8 length bytes fill one block exactly.
        let p = pad(HashFunction::Sha256, &[1u8; 55], 64, "test").unwrap();
        assert_eq!(p.padded_len, 64);
        // 56 bytes spill into a second block.
        let err = pad(HashFunction::Sha256, &[1u8; 56], 64, "test").unwrap_err();
        assert_eq!(
            err,
            DocumentError::UnsupportedLength { buffer: "test", length: 56, ceiling: 64 }
        );
    }

    #[test]
    fn test_ceiling_is_capacity_minus_overhead() {
        assert!(pad(HashFunction::Sha256, &[0u8; 384 - 9], 384, "eContent").is_ok());
        let err = pad(HashFunction::Sha256, &[0u8; 384 - 8], 384, "eContent").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedLength { length: 376, ceiling: 384, .. }));
    }

    #[test]
    fn test_empty_message() {
        let p = pad(HashFunction::Sha1, &[], 64, "test").unwrap();
        assert_eq!(p.bit_length, 0);
        assert_eq!(p.bytes[0], 0x80);
        assert_eq!(p.padded_len, 64);
    }

    mod proptests {
        use super::*;
        use crate::digest::digest;
        use proptest::prelude::*;
        use sha2::{Digest, Sha256};

        proptest! {
            #[test]
            fn padded_prefix_is_original(data in proptest::collection::vec(any::<u8>(), 0..=375)) {
                let p = pad(HashFunction::Sha256, &data, 384, "eContent").unwrap();
                prop_assert_eq!(p.bytes.len(), 384);
                prop_assert_eq!(&p.bytes[..(p.bit_length / 8) as usize], &data[..]);
                prop_assert_eq!(p.padded_len % 64, 0);
                prop_assert!(p.bytes[p.padded_len..].iter().all(|b| *b == 0));
                prop_assert_eq!(digest(HashFunction::Sha256, &data), Sha256::digest(&data).to_vec());
            }

            #[test]
            fn oversized_always_rejected(extra in 1usize..200) {
                let data = vec![0u8; 376 + extra - 1];
                let is_unsupported = matches!(
                    pad(HashFunction::Sha256, &data, 384, "eContent"),
                    Err(DocumentError::UnsupportedLength { .. })
                );
                prop_assert!(is_unsupported);
            }
        }
    }
}
