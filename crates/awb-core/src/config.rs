//! Configuration types.
//!
//! Configuration lives in `config.toml` under the user config directory.
//! Every key is optional; a missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Plugin token, used for the settings page slug and filter names.
    pub token: String,

    /// Prefix prepended to every field id to form its option key.
    pub option_prefix: String,

    /// Plugin version string.
    pub version: String,

    /// Base URL under which plugin directories are served.
    pub plugins_url: String,

    /// Serve unminified scripts.
    pub script_debug: bool,

    /// Location of the JSON option store. Defaults to `options.json` in the
    /// config directory.
    pub store_path: Option<PathBuf>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            token: "aweb_badge_plugin".to_string(),
            option_prefix: "aweb_".to_string(),
            version: "1.2.2".to_string(),
            plugins_url: "http://localhost/wp-content/plugins".to_string(),
            script_debug: false,
            store_path: None,
        }
    }
}

impl PluginConfig {
    /// Load configuration from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from the default location.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load(&path)
    }

    /// Resolve the option store location.
    pub fn resolved_store_path(&self) -> Option<PathBuf> {
        self.store_path
            .clone()
            .or_else(|| config_dir().map(|dir| dir.join("options.json")))
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("awb"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PluginConfig::default();
        assert_eq!(config.token, "aweb_badge_plugin");
        assert_eq!(config.option_prefix, "aweb_");
        assert!(!config.script_debug);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PluginConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "script_debug = true\nstore_path = \"/tmp/o.json\"\n").unwrap();

        let config = PluginConfig::load(&path).unwrap();
        assert!(config.script_debug);
        assert_eq!(config.token, "aweb_badge_plugin");
        assert_eq!(config.resolved_store_path(), Some(PathBuf::from("/tmp/o.json")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "colour = \"red\"\n").unwrap();

        let result = PluginConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
