//! Server metrics
//!
//! Atomic counters shared by every request handler. Relaxed ordering is
//! enough: values are only ever displayed.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters exposed on the admin page
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// Static file requests since start or last reset
    fileserver_hits: AtomicU64,
    /// Posts created since start
    posts_created: AtomicU64,
    /// Requests answered with a 4xx/5xx status
    requests_rejected: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub fileserver_hits: u64,
    pub posts_created: u64,
    pub requests_rejected: u64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_fileserver_hits(&self) {
        self.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fileserver_hits(&self) -> u64 {
        self.fileserver_hits.load(Ordering::Relaxed)
    }

    /// Only the hit counter is resettable
    pub fn reset_fileserver_hits(&self) {
        self.fileserver_hits.store(0, Ordering::Relaxed);
    }

    pub fn increment_posts_created(&self) {
        self.posts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_requests_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fileserver_hits: self.fileserver_hits.load(Ordering::Relaxed),
            posts_created: self.posts_created.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
        }
    }

    /// HTML body for the admin metrics page
    pub fn render_admin_page(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "<html>\n\n<body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n    <p>Chirps created: {}</p>\n    <p>Requests rejected: {}</p>\n</body>\n\n</html>",
            snapshot.fileserver_hits, snapshot.posts_created, snapshot.requests_rejected
        )
    }
}
