use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use super::errors::RefreshTokenError;
use super::store::RefreshTokenStore;
use super::token::generate;
use super::token::RefreshTokenRecord;
use crate::clock::Clock;

/// Lifecycle rules for refresh tokens on top of a [`RefreshTokenStore`].
///
/// Tokens are not rotated on use: the same token keeps minting access
/// tokens until it expires or is revoked.
pub struct RefreshTokenManager {
    store: Arc<dyn RefreshTokenStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl RefreshTokenManager {
    /// # Arguments
    /// * `store` - Backing persistence
    /// * `clock` - Time source for timestamps and expiry checks
    /// * `ttl` - Lifetime of newly created tokens
    pub fn new(store: Arc<dyn RefreshTokenStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    /// Create and persist a new token for `user_id`.
    ///
    /// # Errors
    /// * `HashingFailure` - No secure randomness available
    /// * `Storage` - Persisting the record failed
    pub async fn create(&self, user_id: Uuid) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let record = RefreshTokenRecord::new(generate()?, user_id, self.clock.now(), self.ttl);
        self.store.insert(record).await
    }

    /// Look up a token and check it is still usable.
    ///
    /// Checked in order: existence, revocation, expiry.
    ///
    /// # Errors
    /// * `TokenNotFound` - No such token
    /// * `TokenRevoked` - Token was revoked
    /// * `TokenExpired` - Token outlived its lifetime
    /// * `Storage` - Lookup failed
    pub async fn validate(&self, token: &str) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let record = self
            .store
            .find(token)
            .await?
            .ok_or(RefreshTokenError::TokenNotFound)?;

        record.check(self.clock.now())?;

        Ok(record)
    }

    /// Revoke a token. Revoking twice is not an error.
    ///
    /// # Errors
    /// * `TokenNotFound` - No such token
    /// * `Storage` - Write failed
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        if self.store.revoke(token, self.clock.now()).await? {
            Ok(())
        } else {
            Err(RefreshTokenError::TokenNotFound)
        }
    }
}
