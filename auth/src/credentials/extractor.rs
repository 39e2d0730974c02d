use http::header::AUTHORIZATION;
use http::HeaderMap;

use super::errors::AuthHeaderError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Extract the credential from `Authorization: Bearer <token>`.
///
/// # Errors
/// * `MissingAuthHeader` - No Authorization header
/// * `MalformedAuthHeader` - Other scheme, non-UTF-8 value, or empty token
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthHeaderError> {
    credential_with_prefix(headers, BEARER_PREFIX)
}

/// Extract the credential from `Authorization: ApiKey <key>`.
///
/// # Errors
/// * `MissingAuthHeader` - No Authorization header
/// * `MalformedAuthHeader` - Other scheme, non-UTF-8 value, or empty key
pub fn api_key(headers: &HeaderMap) -> Result<&str, AuthHeaderError> {
    credential_with_prefix(headers, API_KEY_PREFIX)
}

fn credential_with_prefix<'h>(
    headers: &'h HeaderMap,
    prefix: &str,
) -> Result<&'h str, AuthHeaderError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthHeaderError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthHeaderError::MalformedAuthHeader)?;

    let credential = value
        .strip_prefix(prefix)
        .ok_or(AuthHeaderError::MalformedAuthHeader)?
        .trim();

    if credential.is_empty() {
        return Err(AuthHeaderError::MalformedAuthHeader);
    }

    Ok(credential)
}

/// Compare two secrets without short-circuiting on the first difference.
///
/// Only the length comparison returns early; length is not secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
