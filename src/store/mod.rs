//! # Store Module
//!
//! The single JSON document holding every post and user, and the
//! file-backed store that loads and atomically rewrites it.

pub mod codec;
pub mod document;
pub mod errors;
pub mod file;

pub use codec::{decode, encode};
pub use document::{Document, Post, User};
pub use errors::{StoreError, StoreResult};
pub use file::PersistentStore;
