//! Configuration file support for nutri.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nutri/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub entries: EntriesConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the entry store inside `data_dir`
    #[serde(default = "default_entries_file")]
    pub entries_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            entries_file: default_entries_file(),
        }
    }
}

/// Saved entry configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntriesConfig {
    /// Name recorded when a submission leaves the name blank
    #[serde(default = "default_name")]
    pub default_name: String,
}

impl Default for EntriesConfig {
    fn default() -> Self {
        Self {
            default_name: default_name(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("nutri")
}

fn default_entries_file() -> String {
    "users.json".into()
}

fn default_name() -> String {
    crate::Entry::ANONYMOUS.into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject settings that would make the entry store unusable
    pub fn validate(&self) -> Result<()> {
        let file = Path::new(&self.data.entries_file);
        if self.data.entries_file.trim().is_empty() {
            return Err(Error::Config("data.entries_file must not be empty".into()));
        }
        if file.components().count() != 1 || file.file_name().is_none() {
            return Err(Error::Config(format!(
                "data.entries_file must be a plain file name, got {:?}",
                self.data.entries_file
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("nutri").join("config.toml")
    }

    /// Path of the entry store inside the given data directory
    pub fn entries_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data.entries_file)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
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
