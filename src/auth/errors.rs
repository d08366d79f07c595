//! # Auth Errors
//!
//! Error types for the identity service.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    // ==================
    // Credential Errors
    // ==================

    /// Unknown email or wrong password (generic on purpose)
    #[error("Invalid credentials")]
    InvalidCredentials,

    // ==================
    // Header Errors
    // ==================

    /// No Authorization header on the request
    #[error("No authorization header included in request")]
    MissingAuthorization,

    /// Authorization header without the expected scheme
    #[error("Malformed authorization header")]
    MalformedAuthorization,

    /// API key did not match the configured key
    #[error("Invalid API key")]
    InvalidApiKey,

    // ==================
    // JWT Errors
    // ==================

    /// Token could not be parsed or has a bad subject
    #[error("Malformed token")]
    MalformedToken,

    /// Token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Signature does not match the server secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token was issued by someone else
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Refresh token unknown, revoked or expired
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    // ==================
    // Internal Errors
    // ==================

    #[error("Internal error: password hashing failed")]
    HashingFailed,

    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::HashingFailed | AuthError::TokenGenerationFailed => 500,
            _ => 401,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
