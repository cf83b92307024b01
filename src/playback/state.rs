// SPDX-License-Identifier: MPL-2.0
//! Playback status values for the engine state machine.

/// Represents the current status of the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing has been loaded yet (or the last load failed).
    #[default]
    Idle,
    /// Media is currently playing.
    Playing,
    /// Media is paused at the current position.
    Paused,
    /// Playback was stopped or ran to completion; the player resource has
    /// been released.
    Stopped,
}

impl PlaybackStatus {
    /// Returns true if media is currently playing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if media is paused.
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true if nothing has been loaded.
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if playback was stopped.
    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if a player resource is held (playing or paused).
    #[must_use]
    pub fn has_active_media(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}
