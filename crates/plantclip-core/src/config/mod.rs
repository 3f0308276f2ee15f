//! Configuration management for PlantCLIP.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults, then a handful of `BIOCLIP_*` environment variables may
//! override individual values.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for PlantCLIP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Model settings
    pub model: ModelConfig,

    /// Ranking settings
    pub classify: ClassifyConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.plantclip.plantclip/config.toml
    /// - Linux: ~/.config/plantclip/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\plantclip\config\config.toml
    ///
    /// Falls back to ~/.plantclip/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "plantclip", "plantclip")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".plantclip").join("config.toml")
            })
    }

    /// Apply overrides using `lookup` to resolve variable names.
    ///
    /// Recognized: `BIOCLIP_HOST`, `BIOCLIP_PORT`, `BIOCLIP_USE_CPU`,
    /// `BIOCLIP_DEBUG`. Boolean values are `true` when they equal "true"
    /// ignoring case.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BIOCLIP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BIOCLIP_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("BIOCLIP_PORT is not a valid port: {port}"))
            })?;
        }
        if let Some(use_cpu) = lookup("BIOCLIP_USE_CPU") {
            self.model.use_cpu = use_cpu.trim().eq_ignore_ascii_case("true");
        }
        if let Some(debug) = lookup("BIOCLIP_DEBUG") {
            if debug.trim().eq_ignore_ascii_case("true") {
                self.logging.level = "debug".to_string();
            }
        }
        self.validate()
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        let path_str = self.model.model_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.address(), "127.0.0.1:5000");
        assert_eq!(config.classify.top_k, 5);
        assert_eq!(config.classify.zero_shot_candidates, 10);
        assert!(config.model.use_cpu);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[model]"));
        assert!(toml.contains("prompt_template"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 6100\n\n[classify]\ntop_k = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 6100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.classify.top_k, 3);
        assert_eq!(config.model.image_size, 224);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[classify]\ntop_k = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("classify.top_k"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(lookup_from(&[
                ("BIOCLIP_HOST", "0.0.0.0"),
                ("BIOCLIP_PORT", "8081"),
                ("BIOCLIP_USE_CPU", "False"),
                ("BIOCLIP_DEBUG", "TRUE"),
            ]))
            .unwrap();

        assert_eq!(config.server.address(), "0.0.0.0:8081");
        assert!(!config.model.use_cpu);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_override_bad_port() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(lookup_from(&[("BIOCLIP_PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("BIOCLIP_PORT"));
    }

    #[test]
    fn test_no_env_overrides_keeps_defaults() {
        let mut config = Config::default();
        config.apply_env_overrides(|_| None).unwrap();
        assert_eq!(config.server.port, 5000);
        assert!(config.model.use_cpu);
    }

    #[test]
    fn test_model_dir_expands_tilde() {
        let config = Config::default();
        assert!(!config.model_dir().to_string_lossy().starts_with('~'));
    }
}
