//! Integrity tag: hex SHA-256 over `payload ++ "," ++ key`

use crate::utils::error::{MetricsError, Result};
use sha2::{Digest, Sha256};

pub fn sign(payload: &[u8], key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(b",");
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare the tag supplied by the peer with one recomputed locally
pub fn verify(payload: &[u8], key: &str, tag: &str) -> Result<()> {
    let expected = sign(payload, key);
    if constant_time_eq(expected.as_bytes(), tag.trim().to_ascii_lowercase().as_bytes()) {
        Ok(())
    } else {
        Err(MetricsError::SignatureInvalid)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
