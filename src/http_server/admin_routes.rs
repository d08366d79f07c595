//! Admin and Static File Routes
//!
//! Readiness check, the hit counter page and the `/app` file server.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use super::state::AppState;

pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/healthz", get(readiness_handler))
        .route("/api/reset", get(reset_handler))
        .route("/admin/metrics", get(metrics_handler))
        .with_state(state)
}

/// `/app/*` served from `public_dir`, counting every request
pub fn static_routes(state: Arc<AppState>, public_dir: &Path) -> Router {
    Router::new()
        .nest_service("/app", ServeDir::new(public_dir))
        .layer(middleware::from_fn_with_state(state, count_fileserver_hit))
}

async fn count_fileserver_hit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.metrics.increment_fileserver_hits();
    next.run(request).await
}

async fn readiness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.metrics.render_admin_page())
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.reset_fileserver_hits();
    (StatusCode::OK, "Hits reset to 0")
}
