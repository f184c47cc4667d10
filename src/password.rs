//! Credential Store
//!
//! Argon2id password hashing and verification.

use crate::error::ApiError;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};

/// Hashes and verifies password credentials
#[derive(Debug, Clone)]
pub struct CredentialStore {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl CredentialStore {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, ApiError> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| ApiError::Internal)?;

        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Hash a password using Argon2id with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is a normal negative result, not an error; only a
    /// malformed stored hash is treated as an infrastructure failure.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| ApiError::Internal)?;

        Ok(self
            .hasher()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters so the tests stay fast.
    fn test_store() -> CredentialStore {
        CredentialStore::new(1024, 1, 1)
    }

    #[test]
    fn test_hash_and_verify() {
        let store = test_store();
        let hash = store.hash("password123").unwrap();

        assert!(store.verify("password123", &hash).unwrap());
        assert!(!store.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let store = test_store();
        let first = store.hash("password123").unwrap();
        let second = store.hash("password123").unwrap();

        assert_ne!(first, second);
        assert!(store.verify("password123", &first).unwrap());
        assert!(store.verify("password123", &second).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let store = test_store();
        assert!(store.verify("password123", "not-a-phc-string").is_err());
    }
}
