//! Content hashing for downloadable artefacts.

use sha2::{Digest, Sha256};

/// Strong HTTP entity tag (quoted SHA-256 hex digest) for a byte payload.
pub fn content_etag(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Whether an `If-None-Match` header value matches `etag`.
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}
