//! # Identity Service
//!
//! Everything the record store treats as opaque: password hashes, access
//! tokens and refresh tokens. The store only ever persists and compares
//! the strings produced here.

use chrono::{DateTime, Duration, Utc};

use super::crypto::{constant_time_str_eq, generate_refresh_token, hash_password, verify_password};
use super::errors::{AuthError, AuthResult};
use super::jwt::{JwtConfig, JwtManager};

/// Refresh tokens stay valid for 60 days after login
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Hashing, token issuing and token validation behind one handle
#[derive(Clone)]
pub struct IdentityService {
    jwt: JwtManager,
    refresh_token_ttl: Duration,
}

impl IdentityService {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self::with_config(JwtConfig::new(jwt_secret))
    }

    pub fn with_config(config: JwtConfig) -> Self {
        Self {
            jwt: JwtManager::new(config),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }

    pub fn hash(&self, password: &str) -> AuthResult<String> {
        hash_password(password)
    }

    /// Check `password` against `hash`, failing with `InvalidCredentials`
    pub fn verify(&self, password: &str, hash: &str) -> AuthResult<()> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Issue an access token; `requested_secs` is clamped to the configured cap
    pub fn issue_token(&self, user_id: u64, requested_secs: Option<i64>) -> AuthResult<String> {
        let ttl = self.jwt.config().resolve_ttl(requested_secs);
        self.jwt.issue_token(user_id, ttl)
    }

    /// Validate an access token and return its user id
    pub fn validate_token(&self, token: &str) -> AuthResult<u64> {
        self.jwt.validate_token(token)
    }

    pub fn random_opaque_token(&self) -> String {
        generate_refresh_token()
    }

    /// When a refresh token issued at `now` stops being valid
    pub fn refresh_token_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.refresh_token_ttl
    }

    /// Compare a presented API key against the configured one
    pub fn check_api_key(&self, presented: &str, expected: &str) -> AuthResult<()> {
        if !expected.is_empty() && constant_time_str_eq(presented, expected) {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_round_trip() {
        let identity = IdentityService::new("secret");
        let hash = identity.hash("hunter2").unwrap();
        assert!(identity.verify("hunter2", &hash).is_ok());
        assert_eq!(
            identity.verify("hunter3", &hash),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_issue_and_validate() {
        let identity = IdentityService::new("secret");
        let token = identity.issue_token(7, Some(30)).unwrap();
        assert_eq!(identity.validate_token(&token).unwrap(), 7);
    }

    #[test]
    fn test_refresh_expiry_is_sixty_days() {
        let identity = IdentityService::new("secret");
        let now = Utc::now();
        assert_eq!(identity.refresh_token_expiry(now) - now, Duration::days(60));
    }

    #[test]
    fn test_api_key_check() {
        let identity = IdentityService::new("secret");
        assert!(identity.check_api_key("key", "key").is_ok());
        assert_eq!(
            identity.check_api_key("nope", "key"),
            Err(AuthError::InvalidApiKey)
        );
        // An unconfigured key never matches
        assert_eq!(
            identity.check_api_key("", ""),
            Err(AuthError::InvalidApiKey)
        );
    }
}
