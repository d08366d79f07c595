//! # Auth Module
//!
//! The identity service consumed by the HTTP layer: Argon2id password
//! hashing, HS256 access tokens, opaque refresh tokens and Authorization
//! header parsing.

pub mod crypto;
pub mod errors;
pub mod headers;
pub mod identity;
pub mod jwt;

pub use errors::{AuthError, AuthResult};
pub use identity::IdentityService;
pub use jwt::{JwtClaims, JwtConfig, JwtManager};
