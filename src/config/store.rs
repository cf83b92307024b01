// SPDX-License-Identifier: MPL-2.0
//! Settings store seam for the playback controller.
//!
//! The controller only ever needs the accelerometer flag, so the seam is a
//! narrow trait over the wider [`Config`](super::Config) file. The TOML
//! store reads the file on each access so a value written by one instance
//! is visible to another instance opened on the same path — the property
//! the controller relies on across process restarts.

use super::{load, load_from_path, save, save_to_path, Config};
use crate::error::Result;
use std::path::PathBuf;

/// Durable storage for the accelerometer-control preference.
pub trait SettingsStore: Send {
    /// Returns the persisted flag, `false` if it was never set.
    fn accelerometer_enabled(&self) -> bool;

    /// Persists the flag.
    fn set_accelerometer_enabled(&mut self, enabled: bool) -> Result<()>;
}

/// Settings store backed by the `settings.toml` preferences file.
#[derive(Debug, Clone, Default)]
pub struct TomlSettingsStore {
    /// Explicit file path; `None` uses the platform config directory.
    path: Option<PathBuf>,
}

impl TomlSettingsStore {
    /// Store at the platform default location.
    #[must_use]
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Store at an explicit path (tests, portable deployments).
    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn read(&self) -> Config {
        let loaded = match &self.path {
            Some(path) if path.exists() => load_from_path(path),
            Some(_) => Ok(Config::default()),
            None => load(),
        };
        loaded.unwrap_or_default()
    }

    fn write(&self, config: &Config) -> Result<()> {
        match &self.path {
            Some(path) => save_to_path(config, path),
            None => save(config),
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn accelerometer_enabled(&self) -> bool {
        self.read().accelerometer_enabled()
    }

    fn set_accelerometer_enabled(&mut self, enabled: bool) -> Result<()> {
        let mut config = self.read();
        config.accelerometer_enabled = Some(enabled);
        self.write(&config)
    }
}

/// Volatile store for tests; forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    enabled: bool,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn accelerometer_enabled(&self) -> bool {
        self.enabled
    }

    fn set_accelerometer_enabled(&mut self, enabled: bool) -> Result<()> {
        self.enabled = enabled;
        Ok(())
    }
}
