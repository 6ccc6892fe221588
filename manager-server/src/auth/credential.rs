//! Password hashing (argon2id, library default parameters)

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shared::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),

    /// Stored hash is not a valid PHC string
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        tracing::error!(error = %e, "Credential store failure");
        AppError::internal("Credential processing failed")
    }
}

/// One-way password hashing and verification
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialStore;

impl CredentialStore {
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(CredentialError::Hash)?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed
    pub fn verify(&self, hash: &str, plaintext: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash).map_err(CredentialError::MalformedHash)?;
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::MalformedHash(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let store = CredentialStore;
        let hash = store.hash("correct horse").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("correct horse"));
        assert!(store.verify(&hash, "correct horse").unwrap());
        assert!(!store.verify(&hash, "correct horsex").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let store = CredentialStore;
        let a = store.hash("password123").unwrap();
        let b = store.hash("password123").unwrap();
        assert_ne!(a, b);
        assert!(store.verify(&a, "password123").unwrap());
        assert!(store.verify(&b, "password123").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let store = CredentialStore;
        assert!(matches!(
            store.verify("not-a-phc-string", "password123"),
            Err(CredentialError::MalformedHash(_))
        ));
    }
}
