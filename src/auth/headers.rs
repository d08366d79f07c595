//! Authorization header parsing

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::errors::{AuthError, AuthResult};

/// Extract `<token>` from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    credential(headers, "Bearer ")
}

/// Extract `<key>` from `Authorization: ApiKey <key>`
pub fn api_key(headers: &HeaderMap) -> AuthResult<&str> {
    credential(headers, "ApiKey ")
}

fn credential<'a>(headers: &'a HeaderMap, scheme: &str) -> AuthResult<&'a str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthorization)?;

    match value.strip_prefix(scheme) {
        Some(credential) if !credential.is_empty() => Ok(credential),
        _ => Err(AuthError::MalformedAuthorization),
    }
}
