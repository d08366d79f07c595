//! Shared handler state

use axum::http::HeaderMap;

use super::errors::ApiResult;
use crate::auth::{headers, IdentityService};
use crate::observability::ServerMetrics;
use crate::repository::Repository;

/// Everything a handler needs, passed explicitly instead of through globals
pub struct AppState {
    pub repository: Repository,
    pub identity: IdentityService,
    pub polka_key: String,
    pub metrics: ServerMetrics,
}

impl AppState {
    pub fn new(repository: Repository, identity: IdentityService, polka_key: impl Into<String>) -> Self {
        Self {
            repository,
            identity,
            polka_key: polka_key.into(),
            metrics: ServerMetrics::new(),
        }
    }

    /// Resolve the user id from an `Authorization: Bearer <jwt>` header
    pub fn authenticated_user(&self, headers: &HeaderMap) -> ApiResult<u64> {
        let token = headers::bearer_token(headers)?;
        Ok(self.identity.validate_token(token)?)
    }
}
