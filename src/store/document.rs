//! # Document Model
//!
//! The complete snapshot of every post and user, persisted as one unit.
//!
//! Field names follow the on-disk format (`chirps`, `author_id`,
//! `password`, `is_chirpy_red`) so existing database files stay readable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short text post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique, never reused
    pub id: u64,

    /// Filtered body text (at most 140 characters)
    pub body: String,

    /// Id of the user who wrote the post
    pub author_id: u64,
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, never reused
    pub id: u64,

    /// Unique across all users (case-sensitive)
    pub email: String,

    /// Opaque hash produced by the identity service
    #[serde(rename = "password")]
    pub password_hash: String,

    /// Opaque refresh token; empty means no active session
    #[serde(default)]
    pub refresh_token: String,

    /// Only meaningful while `refresh_token` is non-empty
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Set by the payment provider's upgrade notification
    #[serde(rename = "is_chirpy_red", default)]
    pub is_upgraded: bool,
}

impl User {
    /// Whether this user currently holds a refresh token
    pub fn has_session(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Whether the stored refresh token has expired as of `now`.
    ///
    /// A token without an expiry is treated as expired.
    pub fn session_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    pub(crate) fn clear_session(&mut self) {
        self.refresh_token.clear();
        self.expires_at = None;
    }
}

/// The whole store: both collections plus the id counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "chirps", default)]
    pub posts: BTreeMap<u64, Post>,

    #[serde(default)]
    pub users: BTreeMap<u64, User>,

    /// Next post id to hand out
    #[serde(rename = "next_chirp_id", default)]
    pub next_post_id: u64,

    /// Next user id to hand out
    #[serde(default)]
    pub next_user_id: u64,
}

impl Document {
    /// An empty document with counters starting at 1
    pub fn new() -> Self {
        Self {
            posts: BTreeMap::new(),
            users: BTreeMap::new(),
            next_post_id: 1,
            next_user_id: 1,
        }
    }

    /// Raise the counters so they never trail an existing id.
    ///
    /// Files written before the counters existed decode with both at 0.
    pub fn normalize_counters(&mut self) {
        let post_floor = self.posts.keys().next_back().map_or(1, |id| id + 1);
        let user_floor = self.users.keys().next_back().map_or(1, |id| id + 1);
        self.next_post_id = self.next_post_id.max(post_floor);
        self.next_user_id = self.next_user_id.max(user_floor);
    }

    /// Take the next post id
    pub fn allocate_post_id(&mut self) -> u64 {
        self.normalize_counters();
        let id = self.next_post_id;
        self.next_post_id += 1;
        id
    }

    /// Take the next user id
    pub fn allocate_user_id(&mut self) -> u64 {
        self.normalize_counters();
        let id = self.next_user_id;
        self.next_user_id += 1;
        id
    }

    /// Find the user holding `token`. Empty tokens never match.
    pub fn user_by_refresh_token(&self, token: &str) -> Option<&User> {
        if token.is_empty() {
            return None;
        }
        self.users
            .values()
            .find(|u| crate::auth::crypto::constant_time_str_eq(&u.refresh_token, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, token: &str) -> User {
        User {
            id,
            email: format!("user{}@example.com", id),
            password_hash: "hash".to_string(),
            refresh_token: token.to_string(),
            expires_at: None,
            is_upgraded: false,
        }
    }

    #[test]
    fn test_new_document_starts_at_one() {
        let mut doc = Document::new();
        assert_eq!(doc.allocate_post_id(), 1);
        assert_eq!(doc.allocate_post_id(), 2);
        assert_eq!(doc.allocate_user_id(), 1);
    }

    #[test]
    fn test_counters_never_trail_existing_ids() {
        let mut doc = Document::default();
        doc.posts.insert(
            7,
            Post {
                id: 7,
                body: "hi".to_string(),
                author_id: 1,
            },
        );
        doc.users.insert(3, user(3, ""));

        assert_eq!(doc.allocate_post_id(), 8);
        assert_eq!(doc.allocate_user_id(), 4);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut doc = Document::new();
        let first = doc.allocate_post_id();
        let second = doc.allocate_post_id();
        doc.posts.remove(&first);
        doc.posts.remove(&second);
        assert_eq!(doc.allocate_post_id(), 3);
    }

    #[test]
    fn test_empty_token_never_matches() {
        let mut doc = Document::new();
        doc.users.insert(1, user(1, ""));
        assert!(doc.user_by_refresh_token("").is_none());
    }

    #[test]
    fn test_find_user_by_token() {
        let mut doc = Document::new();
        doc.users.insert(1, user(1, "abc"));
        doc.users.insert(2, user(2, "def"));
        assert_eq!(doc.user_by_refresh_token("def").map(|u| u.id), Some(2));
        assert!(doc.user_by_refresh_token("xyz").is_none());
    }

    #[test]
    fn test_session_without_expiry_counts_as_expired() {
        let u = user(1, "abc");
        assert!(u.has_session());
        assert!(u.session_expired_at(Utc::now()));
    }
}
