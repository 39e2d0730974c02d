use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::AccessClaims;
use super::claims::TokenIssuer;
use super::errors::TokenError;
use crate::clock::Clock;

/// Issues and validates access tokens.
///
/// Uses HS256 (HMAC with SHA-256). Holds no state besides the key pair and
/// the clock, so one instance can be shared across all request handlers.
pub struct AccessTokenHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl AccessTokenHandler {
    /// Create a new handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `clock` - Time source for `iat`/`exp` and expiry checks
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            clock,
        }
    }

    /// Sign an access token for `user_id` that lives for `ttl`.
    ///
    /// A zero or negative `ttl` produces a token that never validates.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let claims = AccessClaims::for_user(user_id, self.clock.now(), ttl);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate an access token and return the user it was issued to.
    ///
    /// The signature is checked before any claim is looked at. After that:
    /// issuer, then expiry, then subject.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature mismatch or token not well formed
    /// * `WrongIssuer` - Token was not minted as an access token
    /// * `TokenExpired` - Past `exp`, no `exp`, or `exp` not after `iat`
    /// * `SubjectParseFailure` - `sub` missing or not a UUID
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Time-based claims are checked against the injected clock below
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let claims = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "Access token failed verification");
                TokenError::InvalidSignature
            })?
            .claims;

        if !claims.has_issuer(TokenIssuer::Access) {
            return Err(TokenError::WrongIssuer);
        }

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::TokenExpired);
        }

        let subject = claims
            .sub
            .ok_or_else(|| TokenError::SubjectParseFailure("missing subject".to_string()))?;

        Uuid::parse_str(&subject).map_err(|e| TokenError::SubjectParseFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde::Serialize;

    use super::*;
    use crate::clock::ManualClock;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn handler_with_clock() -> (AccessTokenHandler, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (AccessTokenHandler::new(SECRET, clock.clone()), clock)
    }

    fn sign<T: Serialize>(claims: &T, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let (handler, _) = handler_with_clock();
        let user_id = Uuid::new_v4();

        let token = handler.issue(user_id, Duration::hours(1)).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(handler.validate(&token), Ok(user_id));
    }

    #[test]
    fn test_validate_negative_ttl_is_expired() {
        let (handler, _) = handler_with_clock();

        let token = handler.issue(Uuid::new_v4(), Duration::seconds(-1)).unwrap();

        assert_eq!(handler.validate(&token), Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_validate_zero_ttl_is_expired() {
        let (handler, _) = handler_with_clock();

        let token = handler.issue(Uuid::new_v4(), Duration::zero()).unwrap();

        assert_eq!(handler.validate(&token), Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_validate_after_expiry() {
        let (handler, clock) = handler_with_clock();
        let user_id = Uuid::new_v4();
        let token = handler.issue(user_id, Duration::hours(1)).unwrap();

        clock.advance(Duration::minutes(59));
        assert_eq!(handler.validate(&token), Ok(user_id));

        clock.advance(Duration::minutes(2));
        assert_eq!(handler.validate(&token), Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_validate_tampered_signature() {
        let (handler, _) = handler_with_clock();
        let token = handler.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        assert_eq!(signature.len(), 43);

        // Every position counts, including the last character with its padding bits
        for position in 0..signature.len() {
            let mut bytes = signature.as_bytes().to_vec();
            bytes[position] = if bytes[position] == b'A' { b'g' } else { b'A' };
            let tampered = format!("{}.{}", head, String::from_utf8(bytes).unwrap());

            assert_eq!(
                handler.validate(&tampered),
                Err(TokenError::InvalidSignature),
                "signature altered at position {}",
                position
            );
        }
    }

    #[test]
    fn test_validate_tampered_claims() {
        let (handler, _) = handler_with_clock();
        let token = handler.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();
        let other = handler.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();

        // Graft the second token's claims onto the first token's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(handler.validate(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let clock = Arc::new(ManualClock::default());
        let handler1 = AccessTokenHandler::new(b"secret1_at_least_32_bytes_long_key!", clock.clone());
        let handler2 = AccessTokenHandler::new(b"secret2_at_least_32_bytes_long_key!", clock);

        let token = handler1.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();

        assert_eq!(handler2.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_validate_garbage() {
        let (handler, _) = handler_with_clock();

        assert_eq!(
            handler.validate("invalid.token.here"),
            Err(TokenError::InvalidSignature)
        );
        assert_eq!(handler.validate(""), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let (handler, clock) = handler_with_clock();
        let now = clock.now().timestamp();
        let claims = AccessClaims {
            iss: Some("chirpy-refresh".to_string()),
            sub: Some(Uuid::new_v4().to_string()),
            iat: Some(now),
            exp: Some(now + 3600),
        };

        let token = sign(&claims, SECRET);

        assert_eq!(handler.validate(&token), Err(TokenError::WrongIssuer));
    }

    #[test]
    fn test_issuer_checked_before_expiry() {
        let (handler, clock) = handler_with_clock();
        let now = clock.now().timestamp();
        let claims = AccessClaims {
            iss: None,
            sub: Some(Uuid::new_v4().to_string()),
            iat: Some(now - 7200),
            exp: Some(now - 3600),
        };

        let token = sign(&claims, SECRET);

        assert_eq!(handler.validate(&token), Err(TokenError::WrongIssuer));
    }

    #[test]
    fn test_validate_missing_expiry() {
        #[derive(Serialize)]
        struct NoExpiry {
            iss: &'static str,
            sub: String,
        }

        let (handler, _) = handler_with_clock();
        let token = sign(
            &NoExpiry {
                iss: "chirpy-access",
                sub: Uuid::new_v4().to_string(),
            },
            SECRET,
        );

        assert_eq!(handler.validate(&token), Err(TokenError::TokenExpired));
    }

    #[test]
    fn test_validate_bad_subject() {
        let (handler, clock) = handler_with_clock();
        let now = clock.now().timestamp();
        let claims = AccessClaims {
            iss: Some("chirpy-access".to_string()),
            sub: Some("user123".to_string()),
            iat: Some(now),
            exp: Some(now + 3600),
        };

        let token = sign(&claims, SECRET);

        assert!(matches!(
            handler.validate(&token),
            Err(TokenError::SubjectParseFailure(_))
        ));
    }

    #[test]
    fn test_validate_rejects_other_algorithm() {
        let (handler, clock) = handler_with_clock();
        let claims = AccessClaims::for_user(Uuid::new_v4(), clock.now(), Duration::hours(1));

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(handler.validate(&token), Err(TokenError::InvalidSignature));
    }
}
