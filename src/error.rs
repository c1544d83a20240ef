//! Error types for loading game content and configuration.
//!
//! Actions on a running game never return these; they report through
//! [`crate::game::Outcome`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// Load-time errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Reading a content or config file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content or config file is not valid TOML for its schema
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The room file pattern could not be built
    #[error("Bad room file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The catalog breaks one of its load-time rules
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// The configured starting room is not in the catalog
    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    /// The configured starting room is locked in the catalog
    #[error("Starting room is locked: {0}")]
    LockedInitialRoom(String),

    /// A configuration value is out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, GameError>;
