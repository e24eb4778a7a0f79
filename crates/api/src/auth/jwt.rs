//! Token service
//!
//! Stateless HS256 access tokens. The subject claim carries the
//! account email; expiry is strict (a token whose `exp` equals the
//! current second is already rejected).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account email.
    pub sub: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

/// Issues and validates access tokens with a single shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, default_ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl: Duration::minutes(default_ttl_minutes),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject`, expiring after `ttl`.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::from)
    }

    /// Issue a token with the configured default lifetime.
    pub fn issue_default(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.default_ttl)
    }

    /// Validate a token and return its subject.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: expiry is exact.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        // The library treats exp == now as still valid; the contract
        // here is strictly exp > now.
        if data.claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-at-least-32-characters!!", 30)
    }

    #[test]
    fn issue_and_validate_round_trip() {
        let svc = service();
        let token = svc.issue_default("user@example.com").unwrap();
        let subject = svc.validate(&token).unwrap();
        assert_eq!(subject, "user@example.com");
    }

    #[test]
    fn zero_ttl_token_is_expired() {
        let svc = service();
        let token = svc.issue("user@example.com", Duration::seconds(0)).unwrap();
        assert!(matches!(svc.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn negative_ttl_token_is_expired() {
        let svc = service();
        let token = svc
            .issue("user@example.com", Duration::minutes(-5))
            .unwrap();
        assert!(matches!(svc.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let svc = service();
        let token = svc.issue_default("user@example.com").unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        let forged = jsonwebtoken::EncodingKey::from_secret(b"other-secret");
        let forged_token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                sub: "attacker@example.com".to_string(),
                iat: 0,
                exp: i64::MAX / 2,
            },
            &forged,
        )
        .unwrap();
        let forged_parts: Vec<&str> = forged_token.split('.').collect();
        parts[1] = forged_parts[1];
        let tampered = parts.join(".");

        assert!(matches!(svc.validate(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn token_signed_with_wrong_secret_is_rejected() {
        let other = TokenService::new("another-secret-also-32-chars-long!!!", 30);
        let token = other.issue_default("user@example.com").unwrap();
        assert!(matches!(service().validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let svc = service();
        assert!(svc.validate("").is_err());
        assert!(svc.validate("not-a-jwt").is_err());
        assert!(svc.validate("a.b.c").is_err());
    }

    #[test]
    fn default_ttl_comes_from_configuration() {
        let svc = TokenService::new("test-secret-at-least-32-characters!!", 45);
        assert_eq!(svc.default_ttl(), Duration::minutes(45));
    }
}
