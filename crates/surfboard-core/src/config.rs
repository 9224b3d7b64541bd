//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use surfboard_navigation::{InputResolver, DEFAULT_SEARCH_ENGINE};
use surfboard_tabs::DEFAULT_EVICTION_DELAY;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page opened by new tabs and the home button
    pub homepage: String,
    /// Search engine prefix (or `%s` template) for non-URI input
    pub search_engine: String,
    /// Append-only history log
    pub history_path: PathBuf,
    /// Idle time after which a tab is evicted
    pub eviction_delay_ms: u64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            homepage: "https://lite.duckduckgo.com".to_string(),
            search_engine: DEFAULT_SEARCH_ENGINE.to_string(),
            history_path: data_dir.join("history.jsonl"),
            eviction_delay_ms: DEFAULT_EVICTION_DELAY.as_millis() as u64,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("surfboard"))
            .unwrap_or_else(|| PathBuf::from(".surfboard"))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("surfboard").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".surfboard/config.toml"))
    }

    /// Read a TOML config file; keys left out keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded config");

        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.eviction_delay_ms == 0 {
            return Err(CoreError::Config(
                "eviction_delay_ms must be greater than zero".to_string(),
            ));
        }
        if self.search_engine.trim().is_empty() {
            return Err(CoreError::Config(
                "search_engine cannot be empty".to_string(),
            ));
        }
        InputResolver::require_absolute(&self.homepage)?;
        Ok(())
    }

    pub fn eviction_delay(&self) -> Duration {
        Duration::from_millis(self.eviction_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/surfboard"));
        assert_eq!(config.eviction_delay(), Duration::from_millis(1500));
        assert_eq!(config.history_path, PathBuf::from("/tmp/surfboard/history.jsonl"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "homepage = \"https://example.com\"\neviction_delay_ms = 3000\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.homepage, "https://example.com");
        assert_eq!(config.eviction_delay_ms, 3000);
        assert_eq!(config.search_engine, DEFAULT_SEARCH_ENGINE);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "eviction_delay_ms = 0\n").unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::Config(_))));

        std::fs::write(&path, "homepage = \"example.com\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::Navigation(_))));

        std::fs::write(&path, "homepage = [1, 2]\n").unwrap();
        assert!(matches!(Config::load(&path), Err(CoreError::ConfigParse(_))));
    }
}
