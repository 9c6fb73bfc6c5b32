//! Credential material: argon2 password hashing and reset-token generation.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::OrreryError;

const RESET_TOKEN_LEN: usize = 48;

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, OrreryError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| OrreryError::PasswordHash(e.to_string()))
}

/// Check a plaintext password against a stored PHC string. A mismatch is
/// `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, OrreryError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| OrreryError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Generate an opaque reset token. Returns `(raw, hash)`: the raw token goes
/// into the outbound email, only the SHA-256 hex digest is persisted.
pub fn generate_reset_token() -> (String, String) {
    let raw: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect();
    let hash = hash_reset_token(&raw);
    (raw, hash)
}

pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
