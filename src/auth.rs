//! Password hashing primitives. Argon2 PHC strings at rest; `compare` is the
//! only way to test a candidate plaintext and never reveals the stored hash.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::error::AuthError;

/// Hash a plaintext into an argon2 PHC string with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verify a candidate plaintext against a stored PHC string. An unparseable
/// stored hash reports as a mismatch rather than leaking why.
pub fn compare(stored_hash: &str, candidate: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::Mismatch)?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|_| AuthError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_compare_accepts_the_same_plaintext() {
        let phc = hash_password("Str0ngEnough").unwrap();
        assert!(phc.starts_with("$argon2"));
        compare(&phc, "Str0ngEnough").unwrap();
    }

    #[test]
    fn compare_rejects_wrong_plaintext() {
        let phc = hash_password("Str0ngEnough").unwrap();
        assert!(matches!(compare(&phc, "wrong-guess1"), Err(AuthError::Mismatch)));
    }

    #[test]
    fn garbage_stored_hash_is_a_mismatch() {
        assert!(matches!(compare("not-a-phc-string", "anything"), Err(AuthError::Mismatch)));
    }
}
