#![forbid(unsafe_code)]

//! Application configuration.
//!
//! Loaded from `~/.config/atelier/config.toml` (or the platform
//! equivalent). A missing file means defaults; environment variables and
//! CLI flags override the file, in that order.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ENV_API_URL: &str = "ATELIER_API_URL";
pub const ENV_PAGE_SIZE: &str = "ATELIER_PAGE_SIZE";

const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the backend API.
    pub api_url: String,
    /// Initial rows per table page.
    pub page_size: usize,
    /// Log file path; defaults to the platform data dir.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: atelier_widgets::pagination::DEFAULT_PAGE_SIZE,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Default config file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "atelier-ops", "atelier")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path` when given, else from the default location.
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };
        let Some(path) = path else {
            debug!("no config dir available, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading config");
        let raw = fs::read_to_string(&path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Apply environment overrides through a lookup function, so tests
    /// never touch the process environment.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get(ENV_API_URL)
            && !url.is_empty()
        {
            debug!(%url, "api_url from env");
            self.api_url = url;
        }
        if let Some(raw) = get(ENV_PAGE_SIZE)
            && let Ok(size) = raw.parse::<usize>()
            && size > 0
        {
            debug!(size, "page_size from env");
            self.page_size = size;
        }
    }

    /// The resolved log file path.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        ProjectDirs::from("com", "atelier-ops", "atelier")
            .map(|dirs| dirs.data_dir().join("atelier.log"))
            .unwrap_or_else(|| PathBuf::from("atelier.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"https://ops.example/api\"\npage_size = 50\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api_url, "https://ops.example/api");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = [not toml").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            ENV_API_URL => Some("https://env.example".to_string()),
            ENV_PAGE_SIZE => Some("100".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "https://env.example");
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            ENV_API_URL => Some(String::new()),
            ENV_PAGE_SIZE => Some("zero".to_string()),
            _ => None,
        });
        assert_eq!(config, AppConfig::default());
    }
}
