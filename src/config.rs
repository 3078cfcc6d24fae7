//! Configuration file handling.
//!
//! This module provides loading and saving of pkgguard configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! - Linux: `~/.config/pkgguard/config.toml`
//! - macOS: `~/Library/Application Support/pkgguard/config.toml`
//! - Windows: `%APPDATA%\pkgguard\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! dataset = "https://example.com/affected_packages.json"
//! cache_ttl_hours = 24
//! default_format = "table"
//! strict_shape = false
//! fail_on_affected = true
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::platform::config_dir;

/// Dataset location used when neither `--dataset` nor the config names one.
pub const DEFAULT_DATASET: &str = "affected_packages.json";

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use pkgguard::Config;
///
/// let config = Config::load().unwrap();
/// println!("Dataset: {}", config.dataset);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path or `http(s)://` URL of the affected packages dataset.
    ///
    /// Default: `affected_packages.json` in the working directory
    pub dataset: String,

    /// How long a downloaded dataset stays cached, in hours.
    ///
    /// Default: 24 hours
    pub cache_ttl_hours: u64,

    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json", "sarif"
    /// Default: "table"
    pub default_format: String,

    /// Require the manifest to hold exactly `dependencies` and
    /// `devDependencies`.
    ///
    /// Default: false
    pub strict_shape: bool,

    /// Exit with a non-zero code when affected packages are found.
    ///
    /// Default: false
    pub fail_on_affected: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            cache_ttl_hours: 24,
            default_format: "table".to_string(),
            strict_shape: false,
            fail_on_affected: false,
        }
    }
}

impl Config {
    /// Loads configuration from the config file, or defaults if it doesn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saves the configuration, creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Returns the default configuration rendered as TOML.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
