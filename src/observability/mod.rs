//! Observability for chirpstore
//!
//! - Structured JSON logging
//! - In-process counters for the admin page
//! - The subscriber behind the HTTP request trace
//!
//! # Usage
//!
//! ```ignore
//! use chirpstore::observability::{Logger, ServerMetrics};
//!
//! Logger::info("POST_CREATED", &[("post_id", "42")]);
//!
//! let metrics = ServerMetrics::new();
//! metrics.increment_fileserver_hits();
//! ```

mod logger;
mod metrics;
mod request_trace;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, ServerMetrics};
pub use request_trace::{init_request_tracing, DEFAULT_TRACE_FILTER};
