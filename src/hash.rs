use sha2::{Digest, Sha256};

/// SHA-256 hex digest over the plain text with leading/trailing whitespace
/// trimmed. This is the dedup key: textually identical content hashes
/// identically regardless of surrounding whitespace, while any internal
/// difference produces a new digest.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}
