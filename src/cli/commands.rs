//! CLI command implementations

use std::fs;
use std::io;
use std::path::Path;

use crate::config::ServerConfig;
use crate::http_server::HttpServer;
use crate::observability::{init_request_tracing, Logger};
use crate::repository::Repository;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Serve { config, debug } => serve(config.as_deref(), debug),
        Command::Init { config } => init(config.as_deref()),
    };
    if let Err(e) = &result {
        let message = e.message().to_string();
        Logger::fatal(
            "BOOT_FAILED",
            &[("code", e.code_str()), ("error", message.as_str())],
        );
    }
    result
}

/// Create the database file if it does not exist yet
pub fn init(config_path: Option<&Path>) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    Repository::open(&config.db_path)?;
    Ok(())
}

/// Open the store and serve HTTP until the listener fails
///
/// With `debug`, any existing database file is deleted first.
pub fn serve(config_path: Option<&Path>, debug: bool) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;

    if debug {
        reset_database(&config.db_path)?;
    }

    init_request_tracing()
        .map_err(|e| CliError::boot_failed(format!("Failed to install request tracing: {}", e)))?;

    let repository = Repository::open(&config.db_path)?;
    let server = HttpServer::new(config, repository);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Remove the database file; a missing file is not an error
fn reset_database(path: &Path) -> CliResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            let path = path.display().to_string();
            Logger::warn("STORE_RESET", &[("path", path.as_str())]);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CliError::io_error(format!(
            "failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}
