// SPDX-License-Identifier: MPL-2.0
//! Tilt-to-volume mapping.
//!
//! A pure state machine: each raw accelerometer sample is folded into an
//! exponential moving average, and the smoothed tilt is mapped linearly
//! from [-max_tilt, +max_tilt] onto [0.0, 1.0]. Inputs beyond the range
//! clamp to the nearest bound; nothing is ever rejected.
//!
//! Note: there is no dead-zone around zero tilt. Tiny tilts near level do
//! move the volume; smoothing is the only defense against hand tremor.
//! Whether that is a usability bug is an open question inherited from the
//! behavior being reproduced.

use super::Volume;
use crate::config::{
    Config, DEFAULT_MAX_TILT_MS2, MAX_MAX_TILT_MS2, MAX_SMOOTHING_ALPHA, MIN_MAX_TILT_MS2,
    MIN_SMOOTHING_ALPHA, SMOOTHING_ALPHA,
};
use crate::sensor::TiltSample;

/// Smoothing and mapping state for tilt-driven volume.
#[derive(Debug, Clone)]
pub struct TiltVolumeMapper {
    alpha: f32,
    max_tilt: f32,
    smoothed: f32,
    last_raw: f32,
}

impl TiltVolumeMapper {
    /// Creates a mapper with explicit tunables, clamped to their bounds.
    #[must_use]
    pub fn new(alpha: f32, max_tilt: f32) -> Self {
        Self {
            alpha: alpha.clamp(MIN_SMOOTHING_ALPHA, MAX_SMOOTHING_ALPHA),
            max_tilt: max_tilt.clamp(MIN_MAX_TILT_MS2, MAX_MAX_TILT_MS2),
            smoothed: 0.0,
            last_raw: 0.0,
        }
    }

    /// Creates a mapper from the user's preferences, falling back to the
    /// documented defaults where nothing is set.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.smoothing_alpha(), config.max_tilt())
    }

    /// Folds one raw sample into the smoothing state and returns the
    /// mapped volume.
    pub fn process(&mut self, sample: TiltSample) -> Volume {
        let raw = sample.axis_ms2;
        self.smoothed = self.alpha * raw + (1.0 - self.alpha) * self.smoothed;
        self.last_raw = raw;
        self.map(self.smoothed)
    }

    /// Maps a smoothed tilt value to a volume without touching state.
    #[must_use]
    pub fn map(&self, smoothed_tilt: f32) -> Volume {
        Volume::new((smoothed_tilt + self.max_tilt) / (2.0 * self.max_tilt))
    }

    /// Clears the smoothing state (on disable, and when the engine goes
    /// idle) so a stale average never shapes the next session.
    pub fn reset(&mut self) {
        self.smoothed = 0.0;
        self.last_raw = 0.0;
    }

    #[must_use]
    pub fn smoothed_tilt(&self) -> f32 {
        self.smoothed
    }

    #[must_use]
    pub fn last_raw(&self) -> f32 {
        self.last_raw
    }
}

impl Default for TiltVolumeMapper {
    fn default() -> Self {
        Self::new(SMOOTHING_ALPHA, DEFAULT_MAX_TILT_MS2)
    }
}
