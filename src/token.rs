//! Token Service
//!
//! Issues and validates signed, time-limited bearer tokens.

use crate::error::ApiError;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims carried by a bearer token. The claim names are a wire
/// contract shared with the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub exp: i64,
}

/// Issues and validates HS256-signed bearer tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for a user, expiring after the configured window
    pub fn issue(&self, user_id: i64) -> Result<String, ApiError> {
        let claims = Claims {
            user_id,
            exp: (Utc::now() + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!("Failed to sign token: {:?}", err);
            ApiError::Internal
        })
    }

    /// Validate a token and return the user id it was issued for
    ///
    /// Rejects bad signatures, expired tokens and any signing algorithm
    /// other than HS256 (algorithm confusion must not downgrade the check).
    pub fn validate(&self, token: &str) -> Result<i64, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|err| {
            tracing::debug!("Token validation failed: {:?}", err);
            ApiError::Unauthenticated
        })?;

        Ok(data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-0123456789abcdef";

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let tokens = TokenService::new(SECRET, 72);
        let token = tokens.issue(42).unwrap();

        assert_eq!(tokens.validate(&token).unwrap(), 42);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = TokenService::new(SECRET, 72);
        assert!(tokens.validate("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new(SECRET, 72);
        let verifier = TokenService::new("another-secret-key-0123456789abc", 72);

        let token = issuer.issue(42).unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new(SECRET, 72);
        let claims = Claims {
            user_id: 42,
            exp: (Utc::now() - Duration::seconds(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(tokens.validate(&token).is_err());
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let tokens = TokenService::new(SECRET, 72);
        let claims = Claims {
            user_id: 42,
            exp: (Utc::now() + Duration::seconds(30)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(tokens.validate(&token).unwrap(), 42);
    }

    #[test]
    fn test_token_valid_at_exact_expiry_instant() {
        // With zero leeway only a strictly-past exp is rejected; a token
        // checked at exactly its expiry second still validates.
        let tokens = TokenService::new(SECRET, 72);
        let claims = Claims {
            user_id: 42,
            exp: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(tokens.validate(&token).unwrap(), 42);
    }

    #[test]
    fn test_foreign_algorithm_rejected() {
        // Same secret, different HMAC variant: the pinned validation must
        // refuse it.
        let tokens = TokenService::new(SECRET, 72);
        let claims = Claims {
            user_id: 42,
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(tokens.validate(&token).is_err());
    }
}
