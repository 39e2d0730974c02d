use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Wrong password, or a stored digest that cannot be parsed.
    #[error("Credential mismatch")]
    CredentialMismatch,

    #[error("Password hashing failed: {0}")]
    HashingFailure(String),
}
