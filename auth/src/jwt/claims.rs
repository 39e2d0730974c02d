use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Token types signed with the service secret.
///
/// Stored in the `iss` claim so that a token minted for one purpose can never
/// be accepted as another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenIssuer {
    #[serde(rename = "chirpy-access")]
    Access,
}

impl TokenIssuer {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenIssuer::Access => "chirpy-access",
        }
    }
}

/// Registered claims carried by an access token.
///
/// Every field is optional on the wire so that a token missing a claim
/// decodes and is then rejected with a precise error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl AccessClaims {
    /// Claims for a user, valid from `now` for `ttl`.
    pub fn for_user(user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iss: Some(TokenIssuer::Access.as_str().to_string()),
            sub: Some(user_id.to_string()),
            iat: Some(now.timestamp()),
            exp: Some((now + ttl).timestamp()),
        }
    }

    pub fn has_issuer(&self, issuer: TokenIssuer) -> bool {
        self.iss.as_deref() == Some(issuer.as_str())
    }

    /// A token without `exp`, or one that expired no later than it was
    /// issued, counts as expired regardless of the current time.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        match (self.exp, self.iat) {
            (None, _) => true,
            (Some(exp), Some(iat)) if exp <= iat => true,
            (Some(exp), _) => current_timestamp > exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = AccessClaims::for_user(user_id, now, Duration::hours(1));

        assert_eq!(claims.sub, Some(user_id.to_string()));
        assert!(claims.has_issuer(TokenIssuer::Access));
        assert_eq!(claims.exp.unwrap() - claims.iat.unwrap(), 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let claims = AccessClaims {
            iss: None,
            sub: None,
            iat: Some(500),
            exp: Some(1000),
        };

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_is_expired_no_exp_claim() {
        let claims = AccessClaims {
            iss: None,
            sub: None,
            iat: None,
            exp: None,
        };
        assert!(claims.is_expired(0));
    }

    #[test]
    fn test_is_expired_non_positive_lifetime() {
        let now = Utc::now();
        let zero = AccessClaims::for_user(Uuid::new_v4(), now, Duration::zero());

        assert!(zero.is_expired(now.timestamp() - 10));
    }

    #[test]
    fn test_issuer_serializes_as_constant() {
        let value = serde_json::to_value(TokenIssuer::Access).unwrap();
        assert_eq!(value, serde_json::json!("chirpy-access"));
    }
}
