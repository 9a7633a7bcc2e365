//! Password hashing and verification with Argon2id.
//!
//! Hashes are stored as PHC-format strings
//! (`$argon2id$v=19$m=19456,t=2,p=1$...`), each with a fresh random salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hashes a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| format!("failed to hash password: {err}"))
}

/// Verifies a password against a PHC-format hash string.
///
/// Registration never calls this; it backs digest checks in tests.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|err| format!("invalid password hash: {err}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hash_never_equals_plaintext_and_verifies() {
        let hash = hash_password("pw").unwrap();
        assert_ne!(hash, "pw");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw", &hash).unwrap());
        assert!(!verify_password("other", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }
}
