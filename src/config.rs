//! User configuration
//!
//! Stored as TOML in the platform config directory:
//! - Linux: `~/.config/billtime/config.toml`
//! - macOS: `~/Library/Application Support/billtime/config.toml`
//! - Windows: `%APPDATA%\billtime\config\config.toml`

use anyhow::{Context, Result};
use colored::Colorize;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::draft::{SessionDraft, DEFAULT_HOURLY_RATE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    pub invoice: InvoiceConfig,
}

/// Values a fresh draft starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub hourly_rate: f64,
    pub project_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_RATE,
            project_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub timer_tick_ms: u64,
    pub summary_tick_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timer_tick_ms: 1000,
            summary_tick_ms: 100,
        }
    }
}

impl DisplayConfig {
    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_ms.max(1))
    }

    pub fn summary_tick(&self) -> Duration {
        Duration::from_millis(self.summary_tick_ms.max(1))
    }
}

/// Sender details pre-filled on new invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub your_name: String,
    pub your_email: String,
    pub your_address: String,
    pub payment_details: String,
    pub due_days: i64,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            your_name: String::new(),
            your_email: String::new(),
            your_address: String::new(),
            payment_details: String::new(),
            due_days: 30,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "billtime")
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs().context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load config, falling back to defaults when missing or unreadable
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(_) => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Self::from_toml(&content))
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "{} Failed to load config from {}: {}. Using defaults.",
                    "Warning:".yellow(),
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load config, writing the defaults to disk first if no file exists
    pub fn load_or_create() -> Self {
        if let Ok(path) = Self::config_path() {
            if !path.exists() {
                let config = Self::default();
                if let Err(e) = config.save() {
                    eprintln!("{} Failed to create config file: {}", "Warning:".yellow(), e);
                }
                return config;
            }
        }
        Self::load()
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Overwrite the config file with defaults
    pub fn reset() -> Result<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    /// Directory holding the session database
    ///
    /// `override_dir` (from the command line) wins over `storage.data_dir`,
    /// which wins over the platform data directory.
    pub fn data_dir(&self, override_dir: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = override_dir.or_else(|| self.storage.data_dir.clone()) {
            return Ok(dir);
        }
        let dirs = project_dirs().context("Could not determine data directory")?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Draft a fresh install starts from
    pub fn default_draft(&self) -> SessionDraft {
        SessionDraft {
            project_name: self.defaults.project_name.clone(),
            hourly_rate: if self.defaults.hourly_rate.is_finite() && self.defaults.hourly_rate >= 0.0 {
                self.defaults.hourly_rate
            } else {
                DEFAULT_HOURLY_RATE
            },
            notes: String::new(),
        }
    }
}
