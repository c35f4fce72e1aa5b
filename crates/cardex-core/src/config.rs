//! Configuration management.
//!
//! Settings load from a TOML file under the platform config directory
//! (override with `CARDEX_CONFIG`); every field has a default so a missing
//! file is not an error.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::query::DEFAULT_SEARCH_LIMIT;
use crate::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "CARDEX_CONFIG";

/// Global configuration for the catalog engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Root directory of the content corpus (`<root>/<topic>/<slug>.html`).
    pub content_root: PathBuf,
    /// Directory for the persisted index cache. Defaults to the platform
    /// cache directory when unset.
    pub cache_dir: Option<PathBuf>,
    /// Default result cap for search when the caller does not pass one.
    pub search_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("content"),
            cache_dir: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Resolution order: `CARDEX_CONFIG`, then the platform config
    /// directory. A missing file yields defaults; a present-but-invalid
    /// file is an error.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => Self::default_config_path()?,
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// The cache directory to use, falling back to the platform default.
    pub fn effective_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.cache_dir().to_path_buf()),
        }
    }

    fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "cardex", "cardex")
            .ok_or_else(|| Error::Config("cannot determine platform directories".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.content_root, PathBuf::from("content"));
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "content-root = \"/srv/docs\"\n").expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.content_root, PathBuf::from("/srv/docs"));
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "search-limit = \"veinte\"\n").expect("write");

        match Config::load_from(&path) {
            Err(Error::Serialization(_)) => {},
            other => panic!("expected serialization error, got {other:?}"),
        }
    }

    #[test]
    fn explicit_cache_dir_wins() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/tmp/cardex-cache")),
            ..Config::default()
        };
        assert_eq!(
            config.effective_cache_dir().expect("cache dir"),
            PathBuf::from("/tmp/cardex-cache")
        );
    }
}
