//! Request tracing subscriber
//!
//! The router's `TraceLayer` emits `tracing` events for each request.
//! This installs the process-wide subscriber that prints them.

use std::error::Error;

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_TRACE_FILTER: &str = "warn,tower_http=debug";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_request_tracing() -> Result<(), Box<dyn Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER));

    fmt().with_env_filter(env_filter).with_target(true).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_TRACE_FILTER).is_ok());
    }

    #[test]
    fn test_subscriber_installs_once() {
        assert!(init_request_tracing().is_ok());
        assert!(init_request_tracing().is_err());
    }
}
