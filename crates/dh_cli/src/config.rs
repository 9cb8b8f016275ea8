// Configuration loading (dhondt.toml).
//
// Every key is optional; a missing default file means built-in defaults.
// An explicitly requested file must exist.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dhondt.toml";
pub const DEFAULT_DB_PATH: &str = "dhondt.db";
pub const DEFAULT_LOG_FILTER: &str = "warn";
/// The binary's own events are tagged with its target name, `dhondt`.
pub const VERBOSE_LOG_FILTER: &str = "dhondt=debug,dh_io=debug,dh_pipeline=debug,warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

impl Config {
    /// `explicit` must exist; otherwise fall back to `./dhondt.toml`, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound { path: path.to_path_buf() });
                }
                Self::from_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Flag beats file beats default.
    pub fn db_path(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.database.path.clone())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
    }

    pub fn log_filter(&self, verbose: bool) -> &str {
        if verbose {
            VERBOSE_LOG_FILTER
        } else {
            self.logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg: Config = toml::from_str(
            r#"
            [database]
            path = "/var/lib/dhondt/sims.db"

            [logging]
            filter = "dh_io=debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.db_path(None), "/var/lib/dhondt/sims.db");
        assert_eq!(cfg.db_path(Some("other.db")), "other.db");
        assert_eq!(cfg.log_filter(false), "dh_io=debug");
        assert_eq!(cfg.log_filter(true), VERBOSE_LOG_FILTER);
    }

    #[test]
    fn empty_file_means_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.db_path(None), DEFAULT_DB_PATH);
        assert_eq!(cfg.log_filter(false), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(toml::from_str::<Config>("[database]\npth = \"x\"").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::load(Some(&missing)), Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dhondt.toml");
        std::fs::write(&path, "[database]\npath = \"a.db\"\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().db_path(None), "a.db");
    }
}
