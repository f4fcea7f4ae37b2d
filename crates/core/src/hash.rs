//! Content fingerprinting.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex SHA-256 digest of `text`'s UTF-8 bytes.
pub fn fingerprint(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}
