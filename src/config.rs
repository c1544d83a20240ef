//! Game configuration.
//!
//! Everything has a default, so an empty file (or no file at all) gives the
//! standard 30 minute, 5 hint game with the built-in rooms.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, Result};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "room-escape.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Total time budget in seconds.
    pub time_limit_secs: u32,
    pub max_hints: u32,
    pub initial_room: String,
    /// Chance in `[0, 1]` that searching a room turns up an item.
    pub discovery_chance: f64,
    /// Directory holding `items.toml` and `room_*.toml`; built-in content when unset.
    pub content_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 30 * 60,
            max_hints: 5,
            initial_room: "mystery-room".to_string(),
            discovery_chance: 0.3,
            content_dir: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| GameError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// A zero time budget would start a game that is already out of time.
    pub fn validate(&self) -> Result<()> {
        if self.time_limit_secs == 0 {
            return Err(GameError::InvalidConfig(
                "time_limit_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    /// Reads `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = GameConfig::from_toml(Path::new("x.toml"), "").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.time_limit_secs, 1800);
        assert_eq!(config.max_hints, 5);
        assert_eq!(config.initial_room, "mystery-room");
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = GameConfig::from_toml(
            Path::new("x.toml"),
            "time_limit_secs = 90\nlog_file = \"game.log\"\n",
        )
        .unwrap();
        assert_eq!(config.time_limit_secs, 90);
        assert_eq!(config.log_file, Some(PathBuf::from("game.log")));
        assert_eq!(config.max_hints, 5);
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = GameConfig::from_toml(Path::new("x.toml"), "max_hints = \"many\"").unwrap_err();
        assert!(matches!(err, GameError::Parse { .. }));
    }

    #[test]
    fn zero_time_limit_is_rejected() {
        let err = GameConfig::from_toml(Path::new("x.toml"), "time_limit_secs = 0").unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));

        let config = GameConfig {
            time_limit_secs: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "max_hints = 2").unwrap();
        assert_eq!(GameConfig::resolve(Some(&path)).unwrap().max_hints, 2);
    }

    #[test]
    fn missing_explicit_path_is_io_error() {
        let err = GameConfig::resolve(Some(Path::new("/nonexistent/room-escape.toml"))).unwrap_err();
        assert!(matches!(err, GameError::Io { .. }));
    }
}
