use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a token. Comparing digests keeps the raw
/// configured token out of request-time comparisons.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
