use thiserror::Error;

/// Error type for refresh token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshTokenError {
    #[error("Refresh token not found")]
    TokenNotFound,

    #[error("Refresh token has been revoked")]
    TokenRevoked,

    #[error("Refresh token is expired")]
    TokenExpired,

    /// The secure random source could not produce a token.
    #[error("Secure random source unavailable: {0}")]
    HashingFailure(String),

    #[error("Refresh token storage error: {0}")]
    Storage(String),
}
