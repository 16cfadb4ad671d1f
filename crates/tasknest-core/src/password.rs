//! Password hashing and verification with Argon2id.
//!
//! [`PasswordHasher::hash`] draws a random salt from [`OsRng`] and returns a
//! PHC-format string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), which is
//! what the `password` field of a stored user holds. The cost parameters are
//! fixed per deployment through [`AuthConfig`]; verification reads the
//! parameters back out of the stored PHC string, so hashes made under an
//! older cost still verify.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::AuthConfig;
use crate::error::{Result, TasknestError};

/// Argon2id hasher with fixed cost parameters. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Build a hasher from the configured cost.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| TasknestError::Config(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| TasknestError::PasswordHash(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Check `password` against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only if `hash` is not a
    /// parseable PHC string.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| TasknestError::PasswordHash(format!("Invalid password hash: {}", e)))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::new(&AuthConfig {
            hash_memory_kib: 256,
            hash_iterations: 1,
            hash_parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("correcthorse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correcthorse"));
        assert!(hasher.verify("correcthorse", &hash).unwrap());
        assert!(!hasher.verify("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = cheap_hasher();
        let a = hasher.hash("correcthorse").unwrap();
        let b = hasher.hash("correcthorse").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_embeds_configured_cost() {
        let hash = cheap_hasher().hash("correcthorse").unwrap();
        assert!(hash.contains("m=256,t=1,p=1"), "{hash}");
    }

    #[test]
    fn test_verify_accepts_hash_made_with_other_cost() {
        let old = cheap_hasher().hash("correcthorse").unwrap();
        let current = PasswordHasher::new(&AuthConfig {
            hash_memory_kib: 512,
            hash_iterations: 2,
            hash_parallelism: 1,
        })
        .unwrap();
        assert!(current.verify("correcthorse", &old).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let err = cheap_hasher().verify("correcthorse", "plaintext").unwrap_err();
        assert!(matches!(err, TasknestError::PasswordHash(_)));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = PasswordHasher::new(&AuthConfig {
            hash_memory_kib: 1,
            hash_iterations: 0,
            hash_parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, TasknestError::Config(_)));
    }
}
