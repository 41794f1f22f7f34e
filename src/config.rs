// User configuration

use crate::storage::Backend;
use eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "todolist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    /// Directory the store lives under; `~/` is expanded
    #[serde(default)]
    pub store_path: Option<String>,

    #[serde(default = "default_color")]
    pub color: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_color() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            store_path: None,
            color: default_color(),
            log_level: default_log_level(),
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(format!("{}.yml", APP_NAME)))
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).wrap_err_with(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the store directory: configured path or the user data dir
    pub fn resolve_store_path(&self) -> Result<PathBuf> {
        if let Some(raw) = &self.store_path {
            return Ok(expand_home(raw));
        }
        dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .ok_or_else(|| eyre!("Could not determine a data directory; set store_path in the config"))
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(stripped), Some(home)) => home.join(stripped),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Sqlite);
        assert!(config.color);
        assert_eq!(config.log_level, "warn");
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("todolist.yml");
        fs::write(&path, "backend: jsonl\nstore_path: /tmp/todos\ncolor: false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.backend, Backend::Jsonl);
        assert_eq!(config.store_path.as_deref(), Some("/tmp/todos"));
        assert!(!config.color);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.resolve_store_path().unwrap(), PathBuf::from("/tmp/todos"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(&temp.path().join("absent.yml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("todolist.yml");
        fs::write(&path, "backend: [not, a, backend]\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(err.to_string().contains("todolist.yml"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/todos"), home.join("todos"));
        }
    }
}
