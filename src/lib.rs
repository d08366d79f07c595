//! chirpstore - a concurrent, persistent JSON document store for posts and users
//!
//! - [`store`]: the document codec and the atomic, lock-guarded file store
//! - [`repository`]: typed operations over posts and users
//! - [`auth`]: password hashing, access tokens, refresh tokens
//! - [`http_server`]: the JSON HTTP API

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod repository;
pub mod store;
