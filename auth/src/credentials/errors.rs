use thiserror::Error;

/// Error type for reading credentials out of request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthHeaderError {
    #[error("Authorization header not provided")]
    MissingAuthHeader,

    #[error("Authorization header has the wrong scheme or is empty")]
    MalformedAuthHeader,
}
