//! Content hashing
//!
//! Ledger checksums and drift hashes are written as `sha256:<hex>`; snapshot
//! file names use the bare hex digest.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Lowercase hex SHA-256 of `content`.
pub fn hex_digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// `sha256:<hex>` checksum of `content`.
pub fn compute_content_checksum(content: &str) -> String {
    compute_bytes_checksum(content.as_bytes())
}

/// `sha256:<hex>` checksum of raw bytes, for files that may not be UTF-8.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    format!("{PREFIX}{:x}", Sha256::digest(content))
}
