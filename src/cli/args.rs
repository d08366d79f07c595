//! CLI argument definitions using clap
//!
//! Commands:
//! - chirpstore serve [--config <path>] [--debug]
//! - chirpstore init [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chirpstore - a persistent JSON document store for posts and users
#[derive(Parser, Debug)]
#[command(name = "chirpstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Delete the database file before starting
        #[arg(long)]
        debug: bool,
    },

    /// Create the database file without starting the server
    Init {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_debug() {
        let cli = Cli::try_parse_from(["chirpstore", "serve", "--debug"]).unwrap();
        match cli.command {
            Command::Serve { config, debug } => {
                assert!(config.is_none());
                assert!(debug);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_init_with_config() {
        let cli =
            Cli::try_parse_from(["chirpstore", "init", "--config", "./chirpstore.json"]).unwrap();
        match cli.command {
            Command::Init { config } => {
                assert_eq!(config, Some(PathBuf::from("./chirpstore.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["chirpstore", "query"]).is_err());
    }
}
