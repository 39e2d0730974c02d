use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use super::errors::RefreshTokenError;
use super::token::RefreshTokenRecord;

/// Persistence operations for refresh token records.
///
/// Implementations must make `revoke` a single atomic "set if not already
/// set" write; no in-process locking is expected from callers.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a new record.
    ///
    /// # Errors
    /// * `Storage` - Write failed or the token already exists
    async fn insert(&self, record: RefreshTokenRecord)
        -> Result<RefreshTokenRecord, RefreshTokenError>;

    /// Look up a record by its exact token string.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Read failed
    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, RefreshTokenError>;

    /// Set `revoked_at` to `at` unless already set, and bump `updated_at`.
    ///
    /// # Returns
    /// `true` if the token exists, `false` otherwise
    ///
    /// # Errors
    /// * `Storage` - Write failed
    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool, RefreshTokenError>;
}
