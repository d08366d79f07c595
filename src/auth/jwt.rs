//! # JWT Access Tokens
//!
//! HS256 access tokens carrying only the user id. Validation is stateless:
//! no store lookup is needed to check a token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Issuer
    pub iss: String,

    /// Subject (decimal user id)
    pub sub: String,

    /// Issued at (Unix epoch seconds)
    pub iat: i64,

    /// Expiration (Unix epoch seconds)
    pub exp: i64,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,

    /// Issuer written into and required from every token
    pub issuer: String,

    /// Lifetime when the client does not ask for one
    pub default_ttl: Duration,

    /// Upper bound on a client-requested lifetime
    pub max_ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "chirpy".to_string(),
            default_ttl: Duration::hours(1),
            max_ttl: Duration::hours(1),
        }
    }

    /// Resolve a client-requested lifetime in seconds.
    ///
    /// Missing or non-positive requests get the default; larger ones are
    /// capped at `max_ttl`.
    pub fn resolve_ttl(&self, requested_secs: Option<i64>) -> Duration {
        match requested_secs {
            Some(secs) if secs > 0 => Duration::seconds(secs.min(self.max_ttl.num_seconds())),
            _ => self.default_ttl,
        }
    }
}

/// Signs and validates access tokens
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issue a token for `user_id` that expires after `ttl`
    pub fn issue_token(&self, user_id: u64, ttl: Duration) -> AuthResult<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.config.issuer.clone(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token and return the user id it was issued for
    pub fn validate_token(&self, token: &str) -> AuthResult<u64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;

        let data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                _ => AuthError::MalformedToken,
            }
        })?;

        data.claims
            .sub
            .parse::<u64>()
            .map_err(|_| AuthError::MalformedToken)
    }
}
