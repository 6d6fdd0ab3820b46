//! Configuration for the dashboard.
//!
//! YAML configuration with serde defaults. The CLI takes no flags; the only
//! tuning surface is `$XDG_CONFIG_HOME/ptop/config.yaml`, and a missing or
//! unreadable file silently falls back to defaults.

use crate::error::{MonitorError, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Source of the disk usage bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoBarMode {
    /// Bar shows the configured mount's used capacity percentage;
    /// the table's I/O column shows each process's total read+write bytes.
    #[default]
    Disk,
    /// Bar shows system-wide process I/O as a share of disk capacity;
    /// the table's I/O column shows read/write bytes and each process's
    /// share of the system-wide total.
    Share,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tick interval in milliseconds.
    #[serde(default = "default_update_ms")]
    pub update_ms: u64,

    /// Mount point used for the disk bar.
    #[serde(default = "default_mount_point")]
    pub mount_point: String,

    /// Disk bar mode.
    #[serde(default)]
    pub io_bar: IoBarMode,

    /// Severity colors.
    #[serde(default)]
    pub theme: Theme,
}

fn default_update_ms() -> u64 {
    1000
}
fn default_mount_point() -> String {
    "/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_ms: default_update_ms(),
            mount_point: default_mount_point(),
            io_bar: IoBarMode::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| MonitorError::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).map_err(|e| MonitorError::ConfigParse(e.to_string()))
    }

    /// Loads configuration from a file, falling back to defaults when the
    /// file is missing or invalid.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Returns the configured default path, if a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("ptop/config.yaml"))
    }

    /// Tick interval as a [`Duration`].
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.update_ms, 1000);
        assert_eq!(config.mount_point, "/");
        assert_eq!(config.io_bar, IoBarMode::Disk);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
update_ms: 500
mount_point: /home
io_bar: share
"#;
        let config = Config::parse(yaml).expect("should parse");
        assert_eq!(config.update_ms, 500);
        assert_eq!(config.mount_point, "/home");
        assert_eq!(config.io_bar, IoBarMode::Share);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = Config::parse("update_ms: 250").expect("should parse");
        assert_eq!(config.update_ms, 250);
        assert_eq!(config.mount_point, "/");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = Config::parse("update_ms: [not a number");
        assert!(matches!(result, Err(MonitorError::ConfigParse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/ptop.yaml");
        assert!(matches!(result, Err(MonitorError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/ptop.yaml");
        assert_eq!(config.update_ms, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "update_ms: 2000").expect("write");

        let config = Config::load(file.path()).expect("should load");
        assert_eq!(config.update_ms, 2000);
    }

    #[test]
    fn test_tick_interval() {
        let config = Config { update_ms: 250, ..Config::default() };
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
    }
}
