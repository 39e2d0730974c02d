use std::sync::Arc;

use http::HeaderMap;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::credentials;
use crate::credentials::AuthHeaderError;
use crate::jwt::AccessTokenHandler;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::RefreshTokenError;
use crate::refresh::RefreshTokenManager;
use crate::refresh::RefreshTokenStore;

/// Authentication coordinator.
///
/// Ties together password verification, access token signing, refresh
/// token sessions and header extraction into the login, refresh, revoke and
/// request-authentication flows.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    access_tokens: AccessTokenHandler,
    refresh_tokens: RefreshTokenManager,
    config: AuthConfig,
}

/// Tokens handed out on a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Signed access token, valid for one hour
    pub access_token: String,
    /// Opaque refresh token, valid for sixty days
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authorization header error: {0}")]
    Header(#[from] AuthHeaderError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Access token error: {0}")]
    Token(#[from] TokenError),

    #[error("Refresh token error: {0}")]
    RefreshToken(#[from] RefreshTokenError),
}

impl AuthenticationError {
    /// Whether this is an operational fault rather than a rejected request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AuthenticationError::Password(PasswordError::HashingFailure(_))
                | AuthenticationError::Token(TokenError::EncodingFailed(_))
                | AuthenticationError::RefreshToken(RefreshTokenError::HashingFailure(_))
                | AuthenticationError::RefreshToken(RefreshTokenError::Storage(_))
        )
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Secrets and token lifetimes
    /// * `store` - Refresh token persistence
    /// * `clock` - Time source shared by every expiry check
    pub fn new(
        config: AuthConfig,
        store: Arc<dyn RefreshTokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            access_tokens: AccessTokenHandler::new(
                config.jwt_signing_secret.as_bytes(),
                Arc::clone(&clock),
            ),
            refresh_tokens: RefreshTokenManager::new(store, clock, config.refresh_token_ttl),
            config,
        }
    }

    /// Hash a password for storage. CPU-bound.
    ///
    /// # Errors
    /// * `HashingFailure` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and start a session.
    ///
    /// The password check runs on the blocking thread pool. On success a new
    /// access token and a new refresh token are issued for `user_id`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Hashing infrastructure failed
    /// * `Token` - Access token could not be signed
    /// * `RefreshToken` - Refresh token could not be created
    pub async fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: Uuid,
    ) -> Result<TokenPair, AuthenticationError> {
        let hasher = self.password_hasher;
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| PasswordError::HashingFailure(e.to_string()))?
            .map_err(|e| match e {
                PasswordError::CredentialMismatch => AuthenticationError::InvalidCredentials,
                other => AuthenticationError::Password(other),
            })?;

        let access_token = self.issue_access_token(user_id)?;
        let session = self.refresh_tokens.create(user_id).await?;

        tracing::debug!(user_id = %user_id, "Session started");

        Ok(TokenPair {
            access_token,
            refresh_token: session.token,
        })
    }

    /// Fail a login for an account that does not exist.
    ///
    /// Runs a full password verification against a decoy digest first, so
    /// the rejection takes as long as a wrong password for a real account.
    pub async fn reject_unknown_user(&self, password: &str) -> AuthenticationError {
        let hasher = self.password_hasher;
        let password = password.to_owned();

        match tokio::task::spawn_blocking(move || hasher.verify_decoy(&password)).await {
            Ok(_) => AuthenticationError::InvalidCredentials,
            Err(e) => AuthenticationError::Password(PasswordError::HashingFailure(e.to_string())),
        }
    }

    /// Sign a new access token with the configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_access_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.access_tokens.issue(user_id, self.config.access_token_ttl)
    }

    /// Validate an access token string and return its user.
    pub fn validate_access_token(&self, token: &str) -> Result<Uuid, TokenError> {
        self.access_tokens.validate(token)
    }

    /// Authenticate a request carrying `Authorization: Bearer <access token>`.
    ///
    /// # Errors
    /// * `Header` - Missing or malformed Authorization header
    /// * `Token` - Access token rejected
    pub fn authenticate_bearer(&self, headers: &HeaderMap) -> Result<Uuid, AuthenticationError> {
        let token = credentials::bearer_token(headers)?;
        Ok(self.access_tokens.validate(token)?)
    }

    /// Exchange the bearer refresh token for a new access token.
    ///
    /// The refresh token itself is left untouched.
    ///
    /// # Errors
    /// * `Header` - Missing or malformed Authorization header
    /// * `RefreshToken` - Token unknown, revoked, expired, or storage failed
    /// * `Token` - Access token could not be signed
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<String, AuthenticationError> {
        let token = credentials::bearer_token(headers)?;
        let session = self.refresh_tokens.validate(token).await?;

        Ok(self.issue_access_token(session.user_id)?)
    }

    /// Revoke the bearer refresh token.
    ///
    /// # Errors
    /// * `Header` - Missing or malformed Authorization header
    /// * `RefreshToken` - Token unknown or storage failed
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<(), AuthenticationError> {
        let token = credentials::bearer_token(headers)?;
        Ok(self.refresh_tokens.revoke(token).await?)
    }

    /// Authenticate a trusted caller presenting `Authorization: ApiKey <key>`.
    ///
    /// # Errors
    /// * `Header` - Missing or malformed Authorization header
    /// * `InvalidCredentials` - Key does not match
    pub fn authenticate_api_key(&self, headers: &HeaderMap) -> Result<(), AuthenticationError> {
        let key = credentials::api_key(headers)?;

        if credentials::constant_time_eq(key.as_bytes(), self.config.api_key_secret.as_bytes()) {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }
}
