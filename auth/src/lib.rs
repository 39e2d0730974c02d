//! Authentication core for the Chirpy service
//!
//! Provides the credential and session-token primitives the HTTP layer builds on:
//! - Password hashing (Argon2id)
//! - Short-lived signed access tokens (HS256 JWT)
//! - Long-lived opaque refresh tokens with expiry and revocation
//! - Bearer / API key extraction from request headers
//! - Authentication coordination
//!
//! Secrets are passed in through [`AuthConfig`] and time through a [`Clock`];
//! nothing here reads the environment or the wall clock on its own.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! assert!(hasher.verify("other_password", &hash).is_err());
//! ```
//!
//! ## Access Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AccessTokenHandler, SystemClock};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let handler = AccessTokenHandler::new(b"secret_key_at_least_32_bytes_long!", Arc::new(SystemClock));
//! let user_id = Uuid::new_v4();
//! let token = handler.issue(user_id, Duration::hours(1)).unwrap();
//! assert_eq!(handler.validate(&token).unwrap(), user_id);
//! ```

pub mod authenticator;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use config::AuthConfig;
pub use credentials::AuthHeaderError;
pub use jwt::AccessTokenHandler;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::MemoryRefreshTokenStore;
pub use refresh::RefreshTokenError;
pub use refresh::RefreshTokenManager;
pub use refresh::RefreshTokenRecord;
pub use refresh::RefreshTokenStore;
