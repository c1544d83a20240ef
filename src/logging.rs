//! Logging setup.
//!
//! The terminal UI owns stdout and stderr, so logs only go to a file. With no
//! `log_file` configured nothing is installed and the `tracing` macros are no-ops.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{GameError, Result};

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init(log_file: Option<&Path>, level: &str) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second init (tests, embedding hosts) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(init(None, "debug").is_ok());
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("game.log");
        let err = init(Some(&path), "info").unwrap_err();
        assert!(matches!(err, GameError::Io { path: p, .. } if p == path));
    }

    #[test]
    fn log_file_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.log");
        init(Some(&path), "info").unwrap();
        assert!(path.exists());
        // a second call must not panic on the already-set global subscriber
        init(Some(&path), "info").unwrap();
    }
}
