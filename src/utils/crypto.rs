// file: src/utils/crypto.rs
// version: 1.0.0
// guid: 9e464963-f872-43b2-a329-f337d267118c

use sha2::{Digest, Sha256};

/// Cryptographic utilities for deriving stable names
pub struct CryptoUtils;

impl CryptoUtils {
    /// SHA-256 of `input`, lowercase hex encoded
    pub fn hash_string(input: &str) -> String {
        Self::hash_bytes(input.as_bytes())
    }

    /// SHA-256 of raw bytes, lowercase hex encoded
    pub fn hash_bytes(input: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input);
        hex::encode(hasher.finalize())
    }
}
