use std::fmt::Write;

use stationdesk_core::{AppError, AppResult};

/// Generates a random session token and its SHA-256 hash.
///
/// Returns `(raw_token_hex, sha256_hash_hex)`.
pub fn generate_session_token() -> AppResult<(String, String)> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate session token: {error}")))?;

    let raw_token = to_hex(&bytes);
    let hash = hash_session_token(&raw_token);
    Ok((raw_token, hash))
}

/// Computes the SHA-256 hash of a session token for storage.
#[must_use]
pub fn hash_session_token(raw_token: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
