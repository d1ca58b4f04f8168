//! # SHA Digests
//!
//! Digest of a raw byte buffer under the hash function named by the
//! document signer's certificate.

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use zkpp_core::HashFunction;

/// Compute `hash(data)`.
pub fn digest(hash: HashFunction, data: &[u8]) -> Vec<u8> {
    match hash {
        HashFunction::Sha1 => Sha1::digest(data).to_vec(),
        HashFunction::Sha256 => Sha256::digest(data).to_vec(),
        HashFunction::Sha384 => Sha384::digest(data).to_vec(),
        HashFunction::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Compute `hash(data)` as lowercase hex.
pub fn digest_hex(hash: HashFunction, data: &[u8]) -> String {
    hex::encode(digest(hash, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            digest_hex(HashFunction::Sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            digest_hex(HashFunction::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_lengths_match_hash_function() {
        for h in [
            HashFunction::Sha1,
            HashFunction::Sha256,
            HashFunction::Sha384,
            HashFunction::Sha512,
        ] {
            assert_eq!(digest(h, b"").len(), h.digest_len(), "{h}");
        }
    }
}
