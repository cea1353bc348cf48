//! Configuration file handling.
//!
//! This module provides loading and saving of tfmodcheck configuration
//! from a TOML file. Command line flags override anything set here.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/tfmodcheck/config.toml`
//! - macOS: `~/Library/Application Support/tfmodcheck/config.toml`
//! - Windows: `%APPDATA%\tfmodcheck\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! registry_url = "https://tfmodules.deliveroo.net/"
//! index_file = "modules.json"
//! extension = "tf"
//! exclude_dirs = [".terraform", ".git"]
//! default_granularity = "all"
//! default_format = "text"
//!
//! [ignore]
//! modules = ["legacy-*", "sandbox"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::checker::{normalize_base_url, Granularity};

/// Registry the modules are published to unless configured otherwise.
pub const DEFAULT_REGISTRY_URL: &str = "https://tfmodules.deliveroo.net/";

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use tfmodcheck::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Registry: {}", config.registry_url);
/// println!("Index: {}", config.index_url());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL that module sources are referenced under.
    ///
    /// Default: `https://tfmodules.deliveroo.net/`
    pub registry_url: String,

    /// Name of the index document under `registry_url`.
    ///
    /// Default: "modules.json"
    pub index_file: String,

    /// Extension of the configuration files to scan.
    ///
    /// Default: "tf"
    pub extension: String,

    /// Directory names skipped while walking.
    ///
    /// Default: `.terraform` and `.git`
    pub exclude_dirs: Vec<String>,

    /// Granularity used when `-c` is not given.
    ///
    /// Default: all
    pub default_granularity: Granularity,

    /// Output format used when `--format` is not given.
    ///
    /// Valid values: "text", "json", "table"
    /// Default: "text"
    pub default_format: String,

    /// Modules that are never reported or rewritten.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Configuration for ignoring specific modules.
///
/// Use this for modules intentionally pinned to older versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Module names to skip.
    ///
    /// Supports glob patterns (e.g., "legacy-*", "*-sandbox").
    pub modules: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a module should be skipped.
    pub fn should_ignore_module(&self, module_name: &str) -> bool {
        self.modules.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, module_name)
            } else {
                pattern == module_name
            }
        })
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Check prefix (before first *)
    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    // Check suffix (after last *)
    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    // Check middle parts
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            index_file: "modules.json".to_string(),
            extension: "tf".to_string(),
            exclude_dirs: vec![".terraform".to_string(), ".git".to_string()],
            default_granularity: Granularity::Any,
            default_format: "text".to_string(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parses configuration from TOML text, filling in defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use tfmodcheck::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("tfmodcheck/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tfmodcheck")
            .join("config.toml")
    }

    /// Registry base URL, always ending in `/`.
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.registry_url)
    }

    /// Full URL of the module index document.
    ///
    /// ```
    /// use tfmodcheck::Config;
    ///
    /// let config = Config {
    ///     registry_url: "https://modules.example.com".to_string(),
    ///     ..Config::default()
    /// };
    /// assert_eq!(config.index_url(), "https://modules.example.com/modules.json");
    /// ```
    pub fn index_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url(),
            self.index_file.trim_start_matches('/')
        )
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
