use std::fmt;

use chrono::Duration;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Lifetime of a refresh token.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Secrets and lifetimes consumed by the authentication core.
///
/// Built once at startup and handed to each component; nothing in this
/// crate reads secrets from the environment on its own.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_signing_secret: String,
    pub api_key_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Create a configuration with the standard token lifetimes.
    ///
    /// # Arguments
    /// * `jwt_signing_secret` - HMAC key for access tokens
    /// * `api_key_secret` - Shared secret expected from webhook callers
    pub fn new(jwt_signing_secret: impl Into<String>, api_key_secret: impl Into<String>) -> Self {
        Self {
            jwt_signing_secret: jwt_signing_secret.into(),
            api_key_secret: api_key_secret.into(),
            access_token_ttl: Duration::seconds(ACCESS_TOKEN_TTL_SECONDS),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_signing_secret", &"<redacted>")
            .field("api_key_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = AuthConfig::new("jwt", "api");

        assert_eq!(config.access_token_ttl, Duration::hours(1));
        assert_eq!(config.refresh_token_ttl, Duration::days(60));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig::new("super-secret-signing-key", "polka-key");
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("super-secret-signing-key"));
        assert!(!rendered.contains("polka-key"));
    }
}
