use thiserror::Error;

use crate::domain::chirp::models::ChirpId;
use crate::domain::user::models::UserId;

/// Error type for ChirpId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChirpIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error type for ChirpBody validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChirpBodyError {
    #[error("Chirp is too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all chirp-related operations
#[derive(Debug, Error)]
pub enum ChirpError {
    #[error("Invalid chirp ID: {0}")]
    InvalidChirpId(#[from] ChirpIdError),

    #[error("Invalid chirp: {0}")]
    InvalidBody(#[from] ChirpBodyError),

    #[error("Chirp not found: {0}")]
    NotFound(ChirpId),

    #[error("User {user_id} is not the author of chirp {chirp_id}")]
    NotAuthor { user_id: UserId, chirp_id: ChirpId },

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
