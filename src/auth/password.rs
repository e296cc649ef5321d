//! Argon2 password hashing for the register/login flow.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to generate salt: {0}")]
    Salt(String),

    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Hash a plaintext password into a PHC-format string for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verify a plaintext password against a stored PHC hash.
///
/// An unparseable hash counts as a mismatch rather than an error so the
/// login path stays uniform.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("securepass123").unwrap();
        assert!(verify_password(&hash, "securepass123"));
        assert!(!verify_password(&hash, "wrong-password"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("securepass123").unwrap();
        let b = hash_password("securepass123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_stored_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "securepass123"));
    }
}
