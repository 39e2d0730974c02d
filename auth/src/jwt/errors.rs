use thiserror::Error;

/// Error type for access token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token was not issued as an access token")]
    WrongIssuer,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token subject is not a valid user id: {0}")]
    SubjectParseFailure(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}
