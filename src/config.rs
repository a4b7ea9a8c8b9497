//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/mousestats/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. Every field has a default, so a missing
//! file or a partial one is fine. Command-line flags override whatever is
//! loaded here.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/mousestats/config.json
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::event::BTN_LEFT;
use crate::stats::DEFAULT_RATED_LIFE;
use crate::store::expand_datapath;

/// Default base directory for month files
pub const DEFAULT_DATAPATH: &str = "~/.local/share/mousestats/";

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base directory for the month files (`~` is expanded).
    #[serde(default = "default_datapath")]
    pub datapath: PathBuf,

    /// Event key used for the click rate and life estimates.
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Rated number of presses before the primary button wears out.
    #[serde(default = "default_rated_life")]
    pub rated_life: u64,

    /// How long the event reader blocks before rechecking for shutdown.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_datapath() -> PathBuf {
    PathBuf::from(DEFAULT_DATAPATH)
}

fn default_primary_key() -> String {
    BTN_LEFT.to_string()
}

fn default_rated_life() -> u64 {
    DEFAULT_RATED_LIFE
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datapath: default_datapath(),
            primary_key: default_primary_key(),
            rated_life: default_rated_life(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring configuration: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Base data directory with `~` expanded
    pub fn data_dir(&self) -> PathBuf {
        expand_datapath(&self.datapath)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Return the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "mousestats")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}
