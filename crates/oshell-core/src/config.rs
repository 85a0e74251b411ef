//! Shell configuration.

use crate::error::{ShellError, ShellResult};
use crate::notification::NotificationConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the rc file looked up in the working directory.
pub const DEFAULT_RC_FILE: &str = "oshellrc";

/// Shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Script sourced at startup.
    #[serde(default)]
    pub rc_file: Option<PathBuf>,
    /// Keymap created and bound before the rc file runs.
    #[serde(default = "default_top_keymap")]
    pub top_keymap: String,
    /// Top key of that keymap.
    #[serde(default = "default_top_key")]
    pub top_key: String,
    /// How long the key reader waits for a sub key, in milliseconds (0 = forever).
    #[serde(default = "default_sub_key_timeout")]
    pub sub_key_timeout_ms: u64,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Notification configuration.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Initial values for `set` variables, on top of the built-in defaults.
    /// `topkmap` is derived from `top_keymap` and may only repeat it.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

fn default_top_keymap() -> String {
    "top".to_string()
}

fn default_top_key() -> String {
    "C-t".to_string()
}

fn default_sub_key_timeout() -> u64 {
    2000
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            rc_file: None,
            top_keymap: default_top_keymap(),
            top_key: default_top_key(),
            sub_key_timeout_ms: default_sub_key_timeout(),
            log: LogConfig::default(),
            notifications: NotificationConfig::default(),
            variables: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    /// Load configuration from file.
    pub fn load(path: &Path) -> ShellResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` if given, else the default location, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> ShellResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }

    /// Load from default location.
    pub fn load_default() -> ShellResult<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Get default config path.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "oshell")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> ShellResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ShellError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Key reader timeout, `None` when disabled.
    pub fn sub_key_timeout(&self) -> Option<Duration> {
        (self.sub_key_timeout_ms > 0).then(|| Duration::from_millis(self.sub_key_timeout_ms))
    }

    /// The rc file to source: the configured one, else `./oshellrc` if present.
    pub fn resolve_rc_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.rc_file {
            return Some(path.clone());
        }
        let local = PathBuf::from(DEFAULT_RC_FILE);
        local.exists().then_some(local)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write logs to this file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.top_keymap, "top");
        assert_eq!(config.top_key, "C-t");
        assert_eq!(config.sub_key_timeout(), Some(Duration::from_millis(2000)));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
            top_key = "C-a"
            sub_key_timeout_ms = 0

            [variables]
            border = "3"
            "#,
        )
        .unwrap();
        assert_eq!(config.top_key, "C-a");
        assert_eq!(config.top_keymap, "top");
        assert_eq!(config.sub_key_timeout(), None);
        assert_eq!(config.variables.get("border").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<ShellConfig, _> = toml::from_str("prefix_key = \"C-b\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ShellConfig::default();
        config.rc_file = Some(PathBuf::from("/etc/oshellrc"));
        config.variables.insert("padding".into(), "4".into());
        config.save(&path).unwrap();

        let restored = ShellConfig::load(&path).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_load_reports_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "top_key = ").unwrap();

        assert!(matches!(ShellConfig::load(&path), Err(ShellError::Toml(_))));
    }

    #[test]
    fn test_configured_rc_file_wins() {
        let config = ShellConfig {
            rc_file: Some(PathBuf::from("custom.rc")),
            ..ShellConfig::default()
        };
        assert_eq!(config.resolve_rc_file(), Some(PathBuf::from("custom.rc")));
    }
}
