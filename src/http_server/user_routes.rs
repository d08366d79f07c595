//! User and Session HTTP Routes
//!
//! Registration, profile updates, login and the refresh-token lifecycle.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::{headers, AuthError};
use crate::repository::{RefreshSession, RepositoryError, UserUpdate};
use crate::store::User;

/// User routes with shared state
pub fn user_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/users", post(create_user_handler).put(update_user_handler))
        .route("/api/login", post(login_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/revoke", post(revoke_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// A user without its password hash or refresh token
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_chirpy_red: user.is_upgraded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

// ==================
// Handlers
// ==================

/// Register a new user
async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(request) = payload?;
    let hash = state.identity.hash(&request.password)?;
    let user = state.repository.create_user(&request.email, &hash)?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Change the authenticated user's email and password
async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = state.authenticated_user(&headers)?;
    let Json(request) = payload?;
    let hash = state.identity.hash(&request.password)?;

    let user = state.repository.update_user(
        user_id,
        UserUpdate {
            email: request.email,
            password_hash: hash,
            session: None,
        },
    )?;
    Ok(Json(UserResponse::from(&user)))
}

/// Verify credentials, record a refresh session, issue an access token.
///
/// Only the session fields are written, so a concurrent profile edit is
/// never rolled back.
async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;

    let user = state
        .repository
        .get_user_by_email(&request.email)
        .map_err(|e| match e {
            RepositoryError::NotFound(_) => AuthError::InvalidCredentials.into(),
            other => ApiError::from(other),
        })?;
    state.identity.verify(&request.password, &user.password_hash)?;

    let now = Utc::now();
    let user = state.repository.start_session(
        user.id,
        RefreshSession {
            token: state.identity.random_opaque_token(),
            expires_at: state.identity.refresh_token_expiry(now),
        },
        now,
    )?;

    let token = state
        .identity
        .issue_token(user.id, request.expires_in_seconds)?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(&user),
        token,
        // The stored token, which stays the same while a session is active
        refresh_token: user.refresh_token.clone(),
    }))
}

/// Exchange a refresh token for a new access token
async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let refresh_token = headers::bearer_token(&headers)?;

    let user = state
        .repository
        .confirm_refresh_token(refresh_token)
        .map_err(refresh_rejection)?;
    let token = state.identity.issue_token(user.id, None)?;

    Ok(Json(RefreshResponse { token }))
}

/// Revoke a refresh token
async fn revoke_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let refresh_token = headers::bearer_token(&headers)?;

    state
        .repository
        .revoke_refresh_token(refresh_token)
        .map_err(refresh_rejection)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unknown and expired refresh tokens both answer 401
fn refresh_rejection(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound(_) | RepositoryError::Expired => {
            AuthError::InvalidRefreshToken.into()
        }
        other => other.into(),
    }
}
