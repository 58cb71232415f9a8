//! User configuration
//!
//! Read from `config.toml` (by default `~/.config/flashdeck/config.toml`).
//! Every key is optional:
//!
//! ```toml
//! data_dir = "/home/me/flashcards"
//! user_id = "me"
//!
//! [intervals]
//! again = 0
//! hard = 1
//! good = 3
//! easy = 7
//!
//! [session]
//! max_cards = 20
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::algorithm::IntervalTable;
use crate::flashcards::FlashcardError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Engine(#[from] FlashcardError),

    #[error("Could not determine a config directory")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the card store keeps its files; platform default when unset
    pub data_dir: Option<PathBuf>,
    /// Identity reviews are recorded under
    pub user_id: String,
    pub intervals: IntervalTable,
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            user_id: "local".to_string(),
            intervals: IntervalTable::default(),
            session: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of practice cards per study session
    pub max_cards: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_cards: 20 }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("flashdeck").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.intervals.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            user_id = "ana"

            [intervals]
            easy = 14
            "#,
        )
        .unwrap();

        assert_eq!(config.user_id, "ana");
        assert_eq!(config.intervals.easy, 14);
        assert_eq!(config.intervals.good, IntervalTable::default().good);
        assert_eq!(config.session.max_cards, 20);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_decreasing_intervals_are_rejected() {
        let result = Config::parse("[intervals]\nhard = 10\ngood = 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::Engine(FlashcardError::InvalidIntervals(_)))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(Config::parse("user_id = "), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());

        fs::write(&path, "data_dir = \"/tmp/decks\"\n[session]\nmax_cards = 5\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/decks")));
        assert_eq!(config.session.max_cards, 5);
    }
}
