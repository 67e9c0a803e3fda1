//! Application configuration
//!
//! Stored as `config.json` in the data directory, or at the path given with
//! `--config`. Every field has a default, so a partial file is valid and a
//! missing or unreadable one falls back to [`AppConfig::default`].

use crate::core::error::{Error, Result};
use crate::core::policy::Action;
use crate::utils::{get_data_dir, write_atomic};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default action of the policy at startup
    #[serde(default)]
    pub default_action: Action,
    /// Prompt printed before each interactive command
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Minimum level for log output (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log to `fwsim.log` in the state directory instead of stderr
    #[serde(default = "default_true")]
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_action: Action::Deny,
            prompt: default_prompt(),
            log_level: default_log_level(),
            log_to_file: true,
        }
    }
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Parses [`AppConfig::log_level`].
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for names `tracing` does not know.
    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| Error::Config(format!("unknown log level '{}'", self.log_level)))
    }

    /// Level to install: debug when `verbose`, else the configured level.
    ///
    /// An unknown configured level falls back to warn and is returned
    /// alongside so the caller can report it.
    pub fn effective_level(&self, verbose: bool) -> (Level, Option<Error>) {
        if verbose {
            return (Level::DEBUG, None);
        }
        match self.level() {
            Ok(level) => (level, None),
            Err(e) => (Level::WARN, Some(e)),
        }
    }
}

/// Path of the default config file.
pub fn default_config_path() -> Option<PathBuf> {
    get_data_dir().map(|mut path| {
        path.push("config.json");
        path
    })
}

/// Reads and parses the config at `path`.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, [`Error::Serialization`] if it is
/// not valid config JSON.
pub fn read_config(path: &Path) -> Result<AppConfig> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Loads the config from `path` (or the default location), falling back to
/// defaults when it is missing or invalid.
pub fn load_config(path: Option<&Path>) -> AppConfig {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        return AppConfig::default();
    };
    match read_config(&path) {
        Ok(config) => config,
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            tracing::warn!("Ignoring config {}: {e}", path.display());
            AppConfig::default()
        }
    }
}

/// Saves the config to `path` using an atomic write.
///
/// # Errors
///
/// [`Error::Serialization`] or [`Error::Io`].
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(path, json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.default_action, Action::Deny);
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.level().unwrap(), Level::WARN);
        assert!(config.log_to_file);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "default_action": "allow" }"#).unwrap();
        assert_eq!(config.default_action, Action::Allow);
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_unknown_level_rejected() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.level(), Err(Error::Config(_))));

        let (level, error) = config.effective_level(false);
        assert_eq!(level, Level::WARN);
        assert_eq!(
            error.map(|e| e.to_string()),
            Some("Configuration error: unknown log level 'loud'".to_string())
        );
        let (level, error) = config.effective_level(true);
        assert_eq!(level, Level::DEBUG);
        assert!(error.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            default_action: Action::Allow,
            prompt: "fw> ".to_string(),
            log_level: "debug".to_string(),
            log_to_file: false,
        };

        save_config(&config, &path).unwrap();
        assert_eq!(load_config(Some(&path)), config);
    }

    #[test]
    fn test_missing_and_invalid_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert_eq!(load_config(Some(&missing)), AppConfig::default());

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, "{ not json").unwrap();
        assert_eq!(load_config(Some(&invalid)), AppConfig::default());
        assert!(matches!(read_config(&invalid), Err(Error::Serialization(_))));
    }
}
