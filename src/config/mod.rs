// SPDX-License-Identifier: MPL-2.0
//! User preferences, loaded from and saved to a `settings.toml` file.
//!
//! The accelerometer-control flag is the one preference the playback
//! controller persists on every toggle; the mapper tunables are optional
//! overrides clamped to their documented bounds on read.

pub mod defaults;
mod store;

pub use defaults::*;
pub use store::{MemorySettingsStore, SettingsStore, TomlSettingsStore};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Tiltdeck";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Whether tilt-driven volume control is enabled. Defaults to off.
    #[serde(default)]
    pub accelerometer_enabled: Option<bool>,
    /// Override for the tilt smoothing factor.
    #[serde(default)]
    pub smoothing_alpha: Option<f32>,
    /// Override for the tilt magnitude mapped to the volume extremes.
    #[serde(default)]
    pub max_tilt: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accelerometer_enabled: Some(false),
            smoothing_alpha: None,
            max_tilt: None,
        }
    }
}

impl Config {
    /// Returns the persisted accelerometer flag, `false` if unset.
    #[must_use]
    pub fn accelerometer_enabled(&self) -> bool {
        self.accelerometer_enabled.unwrap_or(false)
    }

    /// Returns the smoothing factor, clamped to its accepted bounds.
    #[must_use]
    pub fn smoothing_alpha(&self) -> f32 {
        self.smoothing_alpha
            .unwrap_or(SMOOTHING_ALPHA)
            .clamp(MIN_SMOOTHING_ALPHA, MAX_SMOOTHING_ALPHA)
    }

    /// Returns the mapped tilt range, clamped to its accepted bounds.
    #[must_use]
    pub fn max_tilt(&self) -> f32 {
        self.max_tilt
            .unwrap_or(DEFAULT_MAX_TILT_MS2)
            .clamp(MIN_MAX_TILT_MS2, MAX_MAX_TILT_MS2)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    fs::write(path, content)?;
    Ok(())
}
