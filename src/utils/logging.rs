//! Diagnostic logging setup.
//!
//! The terminal UI owns stdout, so diagnostics are only written when a log
//! file is requested. Non-interactive subcommands fall back to warnings on
//! stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "EVOLANCE_LOG";
const DEFAULT_FILE_FILTER: &str = "evolance=info";
const DEFAULT_STDERR_FILTER: &str = "warn";

pub fn init_tracing(
    log_file: Option<&Path>,
    interactive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter_or(DEFAULT_FILE_FILTER))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| -> Box<dyn std::error::Error> { err })?;
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter_or(DEFAULT_STDERR_FILTER))
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| -> Box<dyn std::error::Error> { err })?;
        }
    }
    Ok(())
}

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_installs_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("evolance.log");

        init_tracing(Some(&path), true).expect("first subscriber installs");
        assert!(path.exists());
        tracing::info!(target: "evolance", "hello");

        let err = init_tracing(Some(&path), true).expect_err("global subscriber already set");
        assert!(!err.to_string().is_empty());
        assert!(init_tracing(None, true).is_ok());
    }
}
