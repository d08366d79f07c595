//! # HTTP Server Module
//!
//! The transport layer over the record repository.
//!
//! # Endpoints
//!
//! - `/api/healthz`, `/api/reset`, `/admin/metrics` - readiness and counters
//! - `/app/*` - static files
//! - `/api/chirps` - posts
//! - `/api/users`, `/api/login`, `/api/refresh`, `/api/revoke` - accounts and sessions
//! - `/api/polka/webhooks` - payment provider notifications

pub mod admin_routes;
pub mod errors;
pub mod post_routes;
pub mod server;
pub mod state;
pub mod user_routes;
pub mod webhook_routes;

pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use state::AppState;
