use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use crate::error::AuthServiceError;

/// Hash a password with Argon2id, returning the PHC string
/// (`$argon2id$...`) stored in the credential record.
pub fn hash_password(plain: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("hash password: {e}")))
}

/// Verify a password against a stored PHC hash. A malformed stored hash is
/// an internal error, not a credential failure.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, AuthServiceError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("parse stored hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
