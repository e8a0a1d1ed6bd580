//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use sharedrop_core::config::auth::AuthConfig;
use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;

/// Hashes and verifies optional link passwords using Argon2id.
///
/// An empty plaintext is rejected outright: an empty password means
/// "no password" and must be handled by the caller before reaching the
/// guard, so it is never hashed and can never unlock a protected link.
#[derive(Debug, Clone)]
pub struct CredentialGuard {
    argon2: Argon2<'static>,
}

impl CredentialGuard {
    /// Creates a credential guard with cost parameters from configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        if plaintext.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Never fails: a malformed stored hash is treated as a non-match
    /// rather than an error, so a corrupt record locks the link instead
    /// of crashing retrieval.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharedrop_core::error::ErrorKind;

    fn guard() -> CredentialGuard {
        // Minimal cost keeps the tests fast.
        CredentialGuard::new(&AuthConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_verify_round_trip() {
        let guard = guard();
        let hash = guard.hash("secret").unwrap();
        assert!(guard.verify("secret", &hash));
        assert!(!guard.verify("wrong", &hash));
    }

    #[test]
    fn test_empty_password_rejected() {
        let err = guard().hash("").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_malformed_hash_is_non_match() {
        let guard = guard();
        assert!(!guard.verify("secret", "not-a-phc-string"));
        assert!(!guard.verify("secret", ""));
    }

    #[test]
    fn test_distinct_salts() {
        let guard = guard();
        let a = guard.hash("secret").unwrap();
        let b = guard.hash("secret").unwrap();
        assert_ne!(a, b);
        assert!(guard.verify("secret", &a));
        assert!(guard.verify("secret", &b));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let guard = guard();
        let hash = guard.hash("hunter2-plaintext").unwrap();
        assert!(!hash.contains("hunter2-plaintext"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = CredentialGuard::new(&AuthConfig {
            memory_kib: 0,
            iterations: 0,
            parallelism: 0,
        })
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
