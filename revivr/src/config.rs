//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/revivr/config.toml` (or `~/.config/revivr/...`),
//! then overridden by `REVIVR_API_URL` and `REVIVR_DB`. Every failure here is
//! soft: it is logged and the defaults stay in effect.

use std::path::PathBuf;

use serde::Deserialize;

/// Environment variable overriding the review service base URL.
pub const API_URL_ENV: &str = "REVIVR_API_URL";
/// Environment variable overriding the session database path.
pub const DB_PATH_ENV: &str = "REVIVR_DB";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `"dark"` or `"catppuccin-mocha"`.
    pub theme: String,
    /// Base URL of the review service; requests go to `{api_url}/review`.
    pub api_url: String,
    /// SQLite file holding the session slots.
    pub db_path: PathBuf,
    /// `false` keeps the session in memory only; nothing is written to disk.
    pub persist: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            api_url: DEFAULT_API_URL.to_owned(),
            db_path: PathBuf::from(".revivr").join("session.db"),
            persist: true,
        }
    }
}

impl Config {
    /// Loads the config file and applies environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file(&config_path());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parses `path`, or returns defaults if it is missing or invalid.
    pub fn from_file(path: &std::path::Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "no config file; using defaults"
                );
                return Self::default();
            }
        };
        match toml::from_str::<Config>(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "config parse error; using defaults"
                );
                Self::default()
            }
        }
    }

    /// Applies `REVIVR_API_URL` / `REVIVR_DB` from `lookup`. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(path) = lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.db_path = PathBuf::from(path);
        }
    }
}

/// Returns the path to the revivr config file.
///
/// Prefers `$XDG_CONFIG_HOME/revivr/config.toml`; falls back to
/// `~/.config/revivr/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("revivr").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("theme = \"dark\"").unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.db_path, Config::default().db_path);
        assert!(config.persist);
    }

    #[test]
    fn persistence_can_be_switched_off() {
        let config: Config = toml::from_str("persist = false").unwrap();
        assert!(!config.persist);
        assert_eq!(config.theme, DEFAULT_THEME);
    }

    #[test]
    fn missing_or_invalid_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(Config::from_file(&missing), Config::default());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "theme = [").unwrap();
        assert_eq!(Config::from_file(&bad), Config::default());

        let good = dir.path().join("good.toml");
        std::fs::write(
            &good,
            "api_url = \"https://review.example\"\ndb_path = \"/tmp/r.db\"",
        )
        .unwrap();
        let config = Config::from_file(&good);
        assert_eq!(config.api_url, "https://review.example");
        assert_eq!(config.db_path, PathBuf::from("/tmp/r.db"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            API_URL_ENV => Some("http://review.internal:8080".into()),
            DB_PATH_ENV => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://review.internal:8080");
        assert_eq!(config.db_path, Config::default().db_path, "blank override ignored");
    }
}
