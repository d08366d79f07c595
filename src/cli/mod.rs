//! CLI module for chirpstore
//!
//! Provides command-line interface for:
//! - serve: open the store and run the HTTP server
//! - init: create an empty database file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
