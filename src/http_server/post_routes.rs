//! Post HTTP Routes
//!
//! `/api/chirps` create, list, fetch and delete.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::repository::SortOrder;
use crate::store::Post;

/// Post routes with shared state
pub fn post_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chirps", get(list_posts_handler).post(create_post_handler))
        .route(
            "/api/chirps/:chirp_id",
            get(get_post_handler).delete(delete_post_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// Create a post for the authenticated user
async fn create_post_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let author_id = state.authenticated_user(&headers)?;
    let Json(request) = payload?;

    let post = state.repository.create_post(&request.body, author_id)?;
    state.metrics.increment_posts_created();
    Ok((StatusCode::CREATED, Json(post)))
}

/// List posts, optionally by author, sorted by id
async fn list_posts_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<Vec<Post>>> {
    let author_id = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid author_id: {}", raw)))?,
        ),
    };
    let order = SortOrder::parse(query.sort.as_deref().unwrap_or(""));

    Ok(Json(state.repository.get_posts(author_id, order)?))
}

async fn get_post_handler(
    State(state): State<Arc<AppState>>,
    Path(chirp_id): Path<u64>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.repository.get_post_by_id(chirp_id)?))
}

/// Delete a post; only its author may
async fn delete_post_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(chirp_id): Path<u64>,
) -> ApiResult<StatusCode> {
    let requester_id = state.authenticated_user(&headers)?;
    state.repository.delete_post_by_id(chirp_id, requester_id)?;
    Ok(StatusCode::NO_CONTENT)
}
