//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wendler/config.toml`.

use crate::{Error, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Display preferences
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Unit used when showing weights; storage stays in pounds
    #[serde(default)]
    pub weight_unit: WeightUnit,
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".local/share")
    });
    base.join("wendler")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("wendler").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.weight_unit, WeightUnit::Lbs);
        assert!(config.data.data_dir.ends_with("wendler"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.display.weight_unit = WeightUnit::Kg;
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.display.weight_unit, WeightUnit::Kg);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
[display]
weight_unit = "kg"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.display.weight_unit, WeightUnit::Kg);
        assert!(config.data.data_dir.ends_with("wendler"));
    }
}
