use sha2::{Digest, Sha256};

/// Number of hex characters of a lookup key.
pub const LOOKUP_KEY_LEN: usize = 10;

/// Stable key of a term: the first [`LOOKUP_KEY_LEN`] hex characters of its SHA-256 digest.
pub fn lookup_key(term: &str) -> String {
    let mut key = format!("{:x}", Sha256::digest(term.as_bytes()));
    key.truncate(LOOKUP_KEY_LEN);
    key
}
