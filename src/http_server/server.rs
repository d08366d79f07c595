//! # HTTP Server
//!
//! Combines every router over one shared [`AppState`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::admin_routes::{admin_routes, static_routes};
use super::post_routes::post_routes;
use super::state::AppState;
use super::user_routes::user_routes;
use super::webhook_routes::webhook_routes;
use crate::auth::IdentityService;
use crate::config::ServerConfig;
use crate::observability::Logger;
use crate::repository::Repository;

/// HTTP server for the record store
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
    router: Router,
}

impl HttpServer {
    /// Build the server around an already-opened repository
    pub fn new(config: ServerConfig, repository: Repository) -> Self {
        let identity = IdentityService::new(config.jwt_secret.clone());
        let state = Arc::new(AppState::new(repository, identity, config.polka_key.clone()));
        let router = Self::build_router(&config, state.clone());
        Self {
            config,
            state,
            router,
        }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &ServerConfig, state: Arc<AppState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(static_routes(state.clone(), &config.public_dir))
            .merge(admin_routes(state.clone()))
            .merge(post_routes(state.clone()))
            .merge(user_routes(state.clone()))
            .merge(webhook_routes(state.clone()))
            .layer(middleware::from_fn_with_state(state, track_rejections))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the listener fails
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let addr = addr.to_string();
        let db_path = self.config.db_path.display().to_string();
        Logger::info(
            "SERVER_STARTED",
            &[("addr", addr.as_str()), ("db_path", db_path.as_str())],
        );

        axum::serve(listener, self.router).await
    }
}

async fn track_rejections(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        state.metrics.increment_requests_rejected();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(tmp: &TempDir) -> ServerConfig {
        ServerConfig {
            db_path: tmp.path().join("db.json"),
            jwt_secret: "test_secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_router_builds() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let repository = Repository::open(&config.db_path).unwrap();
        let _router = HttpServer::new(config, repository).router();
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let tmp = TempDir::new().unwrap();
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..config(&tmp)
        };
        let repository = Repository::open(&config.db_path).unwrap();
        let server = HttpServer::new(config, repository);
        assert_eq!(server.state().metrics.fileserver_hits(), 0);
    }
}
