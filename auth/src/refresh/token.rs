use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand_core::OsRng;
use rand_core::RngCore;
use uuid::Uuid;

use super::errors::RefreshTokenError;

/// Number of random bytes behind each refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Draw a new opaque refresh token.
///
/// 32 bytes from the operating system CSPRNG, hex-encoded to 64 lowercase
/// characters. There is no fallback source.
///
/// # Errors
/// * `HashingFailure` - The OS random source is unavailable
pub fn generate() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::HashingFailure(e.to_string()))?;

    Ok(hex::encode(bytes))
}

/// Persisted refresh token session.
///
/// `revoked_at` only ever goes from `None` to `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Build a fresh, unrevoked record.
    pub fn new(token: String, user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + ttl,
            revoked_at: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check the record is usable at `now`.
    ///
    /// Revocation wins over expiry: a revoked token is reported as revoked
    /// even once it is also past `expires_at`.
    ///
    /// # Errors
    /// * `TokenRevoked` - Token was explicitly revoked
    /// * `TokenExpired` - Token outlived its lifetime
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), RefreshTokenError> {
        if self.is_revoked() {
            return Err(RefreshTokenError::TokenRevoked);
        }
        if self.is_expired(now) {
            return Err(RefreshTokenError::TokenExpired);
        }
        Ok(())
    }

    /// Mark revoked at `at`, keeping the first revocation time.
    pub fn revoke(&mut self, at: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(at);
        }
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_shape() {
        let token = generate().unwrap();

        assert_eq!(token.len(), 64);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_generate_unique() {
        let tokens: HashSet<String> = (0..10_000).map(|_| generate().unwrap()).collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_check_order() {
        let now = Utc::now();
        let mut record =
            RefreshTokenRecord::new(generate().unwrap(), Uuid::new_v4(), now, Duration::days(60));

        assert_eq!(record.check(now), Ok(()));
        assert_eq!(
            record.check(now + Duration::days(61)),
            Err(RefreshTokenError::TokenExpired)
        );

        record.revoke(now + Duration::hours(1));
        assert_eq!(record.check(now), Err(RefreshTokenError::TokenRevoked));
        assert_eq!(
            record.check(now + Duration::days(61)),
            Err(RefreshTokenError::TokenRevoked)
        );
    }

    #[test]
    fn test_check_at_exact_expiry() {
        let now = Utc::now();
        let record =
            RefreshTokenRecord::new("t".to_string(), Uuid::new_v4(), now, Duration::days(60));

        assert_eq!(record.check(record.expires_at), Ok(()));
    }

    #[test]
    fn test_revoke_keeps_first_timestamp() {
        let now = Utc::now();
        let mut record =
            RefreshTokenRecord::new("t".to_string(), Uuid::new_v4(), now, Duration::days(60));

        record.revoke(now + Duration::hours(1));
        record.revoke(now + Duration::hours(2));

        assert_eq!(record.revoked_at, Some(now + Duration::hours(1)));
        assert_eq!(record.updated_at, now + Duration::hours(2));
    }
}
