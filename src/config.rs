//! User configuration loaded from TOML.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_REFRESH_MS: u64 = 100;
const MIN_REFRESH_MS: u64 = 20;
const MAX_REFRESH_MS: u64 = 2000;

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory names never descended into while scanning
    pub exclude: Vec<String>,
    /// How often the progress display is refreshed, in milliseconds
    pub refresh_ms: u64,
    pub verbose: bool,
    /// Subtree reported separately from each scanned root
    pub separate: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exclude: Vec::new(),
            refresh_ms: DEFAULT_REFRESH_MS,
            verbose: false,
            separate: None,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/reclaim/config.toml`, falling back to `~/.config`.
    pub fn default_path() -> Option<PathBuf> {
        let base = match env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(env::var_os("HOME")?).join(".config"),
        };
        Some(base.join("reclaim").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let Some(path) = Self::default_path() else {
            return Ok(Config::default());
        };
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid TOML")?;
        Ok(config)
    }

    /// Progress refresh interval, clamped to a sane range
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.refresh_interval(), Duration::from_millis(100));
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
exclude = ["archive", "keep"]
refresh_ms = 250
verbose = true
separate = "/Users/dev/Library"
"#,
        )
        .unwrap();
        assert_eq!(config.exclude, vec!["archive", "keep"]);
        assert_eq!(config.refresh_interval(), Duration::from_millis(250));
        assert!(config.verbose);
        assert_eq!(config.separate, Some(PathBuf::from("/Users/dev/Library")));
    }

    #[test]
    fn refresh_is_clamped() {
        let fast = Config::parse("refresh_ms = 1").unwrap();
        assert_eq!(fast.refresh_interval(), Duration::from_millis(MIN_REFRESH_MS));
        let slow = Config::parse("refresh_ms = 999999").unwrap();
        assert_eq!(slow.refresh_interval(), Duration::from_millis(MAX_REFRESH_MS));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("allowlist = [\"src\"]").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "exclude = [\"vendor-cache\"]\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.exclude, vec!["vendor-cache"]);
    }
}
