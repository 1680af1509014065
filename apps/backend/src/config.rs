//! # Backend Configuration
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.
//!
//! ## Variables
//! | Variable                    | Default                         |
//! |-----------------------------|---------------------------------|
//! | `SCHOOL_DB_PATH`            | `<data dir>/school.db`          |
//! | `SCHOOL_DB_MAX_CONNECTIONS` | `5`                             |
//! | `SCHOOL_ASSET_SOURCE_DIR`   | `assets`                        |
//! | `SCHOOL_ASSET_DIR`          | `<data dir>/assets`             |
//! | `SCHOOL_DEFAULT_PAGE_SIZE`  | `20`                            |
//!
//! `<data dir>` is the platform data directory:
//! - **macOS**: `~/Library/Application Support/com.schooldesk.backend`
//! - **Windows**: `%APPDATA%\schooldesk\backend\data`
//! - **Linux**: `~/.local/share/backend`

use directories::ProjectDirs;
use school_core::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Where the bundled templates ship
    pub asset_source_dir: PathBuf,

    /// Where templates are read from at runtime
    pub asset_dir: PathBuf,

    /// List page size when a query has no `limit` (1..=100)
    pub default_page_size: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = AppConfig {
            database_path: match lookup("SCHOOL_DB_PATH") {
                Some(path) => PathBuf::from(path),
                None => default_data_dir()?.join("school.db"),
            },

            max_connections: parse_number(&lookup, "SCHOOL_DB_MAX_CONNECTIONS", 5)?,

            asset_source_dir: lookup("SCHOOL_ASSET_SOURCE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets")),

            asset_dir: match lookup("SCHOOL_ASSET_DIR") {
                Some(path) => PathBuf::from(path),
                None => default_data_dir()?.join("assets"),
            },

            default_page_size: parse_number(&lookup, "SCHOOL_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("SCHOOL_DB_MAX_CONNECTIONS".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&config.default_page_size) {
            return Err(ConfigError::InvalidValue("SCHOOL_DEFAULT_PAGE_SIZE".to_string()));
        }

        Ok(config)
    }
}

fn parse_number<F>(lookup: &F, name: &str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("com", "schooldesk", "backend")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine app data directory")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_explicit_values() {
        let env = vars(&[
            ("SCHOOL_DB_PATH", "/srv/school/school.db"),
            ("SCHOOL_DB_MAX_CONNECTIONS", "8"),
            ("SCHOOL_ASSET_SOURCE_DIR", "/opt/school/assets"),
            ("SCHOOL_ASSET_DIR", "/srv/school/assets"),
            ("SCHOOL_DEFAULT_PAGE_SIZE", " 50 "),
        ]);

        let config = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/school/school.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.asset_source_dir, PathBuf::from("/opt/school/assets"));
        assert_eq!(config.asset_dir, PathBuf::from("/srv/school/assets"));
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn test_numeric_defaults() {
        let env = vars(&[
            ("SCHOOL_DB_PATH", "school.db"),
            ("SCHOOL_ASSET_DIR", "runtime"),
        ]);

        let config = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.asset_source_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_invalid_numbers_name_the_variable() {
        let env = vars(&[
            ("SCHOOL_DB_PATH", "school.db"),
            ("SCHOOL_ASSET_DIR", "runtime"),
            ("SCHOOL_DB_MAX_CONNECTIONS", "many"),
        ]);
        let err = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for SCHOOL_DB_MAX_CONNECTIONS");

        let env = vars(&[
            ("SCHOOL_DB_PATH", "school.db"),
            ("SCHOOL_ASSET_DIR", "runtime"),
            ("SCHOOL_DEFAULT_PAGE_SIZE", "101"),
        ]);
        let err = AppConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name) if name == "SCHOOL_DEFAULT_PAGE_SIZE"));
    }
}
