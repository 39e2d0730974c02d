use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use rand_core::OsRng;
use rand_core::RngCore;

use super::errors::PasswordError;

/// Salt length in bytes.
const SALT_BYTES: usize = 16;

/// Well-formed digest at the default cost that no password matches.
///
/// Verified against when there is no stored hash, so a miss costs as much
/// as a wrong password.
const DECOY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$\
                          AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// Both operations are CPU-bound and block the calling thread for tens of
/// milliseconds; async callers should run them on a blocking worker.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with a fresh random salt on every call, so hashing the
    /// same password twice yields two different digests.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailure` - Salt generation or hashing failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordError::HashingFailure(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::HashingFailure(e.to_string()))?;
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailure(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Errors
    /// * `CredentialMismatch` - Password does not match, or the hash is malformed
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::CredentialMismatch)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| PasswordError::CredentialMismatch)
    }

    /// Spend a full verification on a digest nothing matches.
    ///
    /// Always ends in `CredentialMismatch`.
    pub fn verify_decoy(&self, password: &str) -> PasswordError {
        let _ = self.verify(password, DECOY_HASH);
        PasswordError::CredentialMismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(hasher.verify(password, &hash), Ok(()));
        assert_eq!(
            hasher.verify("wrong_password", &hash),
            Err(PasswordError::CredentialMismatch)
        );
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same password", &first).is_ok());
        assert!(hasher.verify("same password", &second).is_ok());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();

        assert_eq!(
            hasher.verify("password", "invalid_hash"),
            Err(PasswordError::CredentialMismatch)
        );
        assert_eq!(
            hasher.verify("password", ""),
            Err(PasswordError::CredentialMismatch)
        );
    }

    #[test]
    fn test_decoy_hash_is_real_work() {
        // A malformed decoy would be rejected before any hashing happens
        let parsed = PasswordHash::new(DECOY_HASH).unwrap();
        let params = argon2::Params::try_from(&parsed).unwrap();
        let defaults = argon2::Params::default();

        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());
        assert_eq!(params.m_cost(), defaults.m_cost());
        assert_eq!(params.t_cost(), defaults.t_cost());
        assert_eq!(params.p_cost(), defaults.p_cost());
        assert_eq!(params.output_len(), Some(32));
    }

    #[test]
    fn test_verify_decoy_never_matches() {
        let hasher = PasswordHasher::new();

        assert_eq!(hasher.verify_decoy(""), PasswordError::CredentialMismatch);
        assert_eq!(
            hasher.verify_decoy("password"),
            PasswordError::CredentialMismatch
        );
    }

    #[test]
    fn test_hash_uses_default_parameters() {
        let hash = PasswordHasher::new().hash("password").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert_eq!(parsed.salt.map(|salt| salt.len()), Some(22));
        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[test]
    fn test_empty_password_is_hashable() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash("").unwrap();
        assert!(hasher.verify("", &hash).is_ok());
        assert!(hasher.verify(" ", &hash).is_err());
    }
}
