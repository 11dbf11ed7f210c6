//! hashing helpers for wps-chain
use hex::encode as hex_encode;
use sha3::{Digest, Sha3_512};

use crate::types::Hash;

/// compute sha3-512 hex string of bytes
pub fn sha3_512_hex(data: &[u8]) -> String {
    hex_encode(sha3_512_bytes(data))
}

/// compute sha3-512 raw bytes (64 bytes)
pub fn sha3_512_bytes(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    hasher.update(data);
    let sum = hasher.finalize();
    sum.into()
}

/// compute sha3-512 and return as Hash type
pub fn sha3_512(data: &[u8]) -> Hash {
    Hash::from_bytes(sha3_512_bytes(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_512_empty_input() {
        // NIST test vector for the empty message
        assert!(sha3_512_hex(b"").starts_with("a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6"));
    }

    #[test]
    fn test_hash_matches_hex() {
        let h = sha3_512(b"worker");
        assert_eq!(h.to_hex(), sha3_512_hex(b"worker"));
    }
}
