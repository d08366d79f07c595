//! # Record Repository
//!
//! Entity-level operations on posts and users, built on the
//! [`PersistentStore`].
//!
//! ## Invariants
//! - No snapshot is kept between calls; every operation re-loads the document
//! - Every mutation is one read-modify-write cycle under the store's
//!   exclusive lock, so ids come from a monotonic counter and are never
//!   reused
//! - Email uniqueness is case-sensitive
//! - Refresh-token fields are only written when none is stored, and only
//!   cleared by `revoke_refresh_token`

use std::path::Path;
use std::sync::Arc;

use crate::store::PersistentStore;

pub mod errors;
pub mod filter;
mod posts;
pub mod sort;
mod users;

pub use errors::{RepositoryError, RepositoryResult};
pub use sort::SortOrder;
pub use users::{RefreshSession, UserUpdate};

/// Invariant-checked access to the document store
#[derive(Debug, Clone)]
pub struct Repository {
    store: Arc<PersistentStore>,
}

impl Repository {
    pub fn new(store: Arc<PersistentStore>) -> Self {
        Self { store }
    }

    /// Open (creating if needed) the document at `path`
    pub fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let store = PersistentStore::open(path)?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }
}
