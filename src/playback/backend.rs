// SPDX-License-Identifier: MPL-2.0
//! Player backend seam.
//!
//! The engine owns exactly one native player resource at a time; this
//! module defines the traits that resource hides behind, plus a
//! clock-driven reference backend that models decoding with the position
//! clock so the whole control plane runs (and is tested) without codecs
//! or audio hardware.

use super::{PositionClock, Volume};
use crate::domain::MediaUri;
use crate::error::PlaybackError;
use std::collections::HashMap;
use std::time::Duration;

/// Factory for player resources.
pub trait PlayerBackend: Send {
    /// Opens `uri` and returns a handle paused at position zero.
    ///
    /// Implementations must fail promptly with
    /// [`PlaybackError::SourceUnavailable`] rather than hang on a source
    /// that cannot be opened.
    fn open(&self, uri: &MediaUri)
        -> std::result::Result<Box<dyn PlayerHandle>, PlaybackError>;
}

/// The single active native player resource.
///
/// Handles are owned exclusively by the engine and dropped to release the
/// underlying resource; dropping an already-stopped handle is a no-op.
pub trait PlayerHandle: Send {
    /// Starts or resumes rendering from the current position.
    fn resume(&mut self);

    /// Pauses rendering, retaining the position.
    fn pause(&mut self);

    /// Jumps to `position`, clamped to the media duration.
    fn seek(&mut self, position: Duration);

    /// Applies an already-clamped volume.
    fn set_volume(&mut self, volume: Volume);

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Total media duration.
    fn duration(&self) -> Duration;

    /// True once the stream has rendered to its end.
    fn is_finished(&self) -> bool;
}

/// Reference backend: sources are registered `(uri, duration)` pairs and a
/// handle "renders" by letting the position clock run against the wall
/// clock. Opening an unregistered URI fails the same way a missing file
/// does on a device.
#[derive(Debug, Default)]
pub struct ClockBackend {
    sources: HashMap<String, Duration>,
}

impl ClockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a playable source.
    pub fn register(&mut self, uri: &MediaUri, duration: Duration) {
        self.sources.insert(uri.as_str().to_string(), duration);
    }

    /// Builds a backend from `(uri, duration)` pairs.
    #[must_use]
    pub fn with_sources(sources: impl IntoIterator<Item = (MediaUri, Duration)>) -> Self {
        Self {
            sources: sources
                .into_iter()
                .map(|(uri, duration)| (uri.as_str().to_string(), duration))
                .collect(),
        }
    }
}

impl PlayerBackend for ClockBackend {
    fn open(
        &self,
        uri: &MediaUri,
    ) -> std::result::Result<Box<dyn PlayerHandle>, PlaybackError> {
        match self.sources.get(uri.as_str()) {
            Some(&duration) => Ok(Box::new(ClockPlayer::new(duration))),
            None => Err(PlaybackError::SourceUnavailable(uri.as_str().to_string())),
        }
    }
}

/// Player resource driven by the position clock.
#[derive(Debug)]
pub struct ClockPlayer {
    clock: PositionClock,
    duration: Duration,
    volume: Volume,
}

impl ClockPlayer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            clock: PositionClock::new(),
            duration,
            volume: Volume::default(),
        }
    }

    /// Volume last applied to this handle.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }
}

impl PlayerHandle for ClockPlayer {
    fn resume(&mut self) {
        if !self.clock.is_running() {
            self.clock.resume();
        }
    }

    fn pause(&mut self) {
        self.clock.pause();
    }

    fn seek(&mut self, position: Duration) {
        self.clock.seek(position.min(self.duration));
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn position(&self) -> Duration {
        self.clock.position().min(self.duration)
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.clock.position() >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(raw: &str) -> MediaUri {
        MediaUri::new(raw).unwrap()
    }

    #[test]
    fn open_fails_for_unregistered_sources() {
        let backend = ClockBackend::new();
        let err = backend.open(&uri("/tmp/missing.mp3")).err().unwrap();
        assert_eq!(
            err,
            PlaybackError::SourceUnavailable("/tmp/missing.mp3".to_string())
        );
    }

    #[test]
    fn open_returns_a_paused_handle_at_zero() {
        let mut backend = ClockBackend::new();
        backend.register(&uri("/tmp/a.mp3"), Duration::from_secs(30));

        let handle = backend.open(&uri("/tmp/a.mp3")).unwrap();
        assert_eq!(handle.position(), Duration::ZERO);
        assert!(!handle.is_finished());
        assert_eq!(handle.duration(), Duration::from_secs(30));
    }

    #[test]
    fn seek_clamps_to_the_duration() {
        let mut handle = ClockPlayer::new(Duration::from_secs(10));
        handle.seek(Duration::from_secs(99));
        assert_eq!(handle.position(), Duration::from_secs(10));
        assert!(handle.is_finished());
    }

    #[test]
    fn pause_retains_position_and_resume_continues() {
        let mut handle = ClockPlayer::new(Duration::from_secs(600));
        handle.resume();
        handle.seek(Duration::from_secs(10));
        handle.pause();

        let held = handle.position();
        assert!(held >= Duration::from_secs(10));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(handle.position(), held);

        handle.resume();
        assert!(handle.position() >= held);
    }

    #[test]
    fn zero_length_media_finishes_immediately() {
        let handle = ClockPlayer::new(Duration::ZERO);
        assert!(handle.is_finished());
    }

    #[test]
    fn set_volume_is_remembered() {
        let mut handle = ClockPlayer::new(Duration::from_secs(5));
        handle.set_volume(Volume::new(0.7));
        assert_eq!(handle.volume(), Volume::new(0.7));
    }
}
