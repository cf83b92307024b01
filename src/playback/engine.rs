// SPDX-License-Identifier: MPL-2.0
//! Playback engine state machine.
//!
//! Manages the lifecycle of the single active media player:
//! - Idle: nothing loaded (or the last load failed)
//! - Playing: actively rendering
//! - Paused: position retained, ready to resume
//! - Stopped: resource released, position reset
//!
//! The engine owns exactly one [`PlayerHandle`] at a time. Starting
//! playback of a new URI releases the previous handle first, and `stop`
//! or natural end-of-media releases it entirely; releasing when nothing
//! is held is an idempotent no-op.

use super::backend::{PlayerBackend, PlayerHandle};
use super::state::PlaybackStatus;
use super::Volume;
use crate::domain::MediaUri;
use crate::error::PlaybackError;
use std::time::Duration;
use tokio::sync::mpsc;

/// Events the engine emits outside the call path of its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The active media played to its natural end; the engine has
    /// transitioned to `Stopped` and released the player resource.
    Completed { uri: MediaUri },
}

struct ActiveMedia {
    uri: MediaUri,
    handle: Box<dyn PlayerHandle>,
}

/// State machine owning the single active player resource.
pub struct PlaybackEngine {
    backend: Box<dyn PlayerBackend>,
    status: PlaybackStatus,
    active: Option<ActiveMedia>,
    volume: Volume,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<EngineEvent>>,
}

impl PlaybackEngine {
    /// Creates an idle engine over the given backend.
    #[must_use]
    pub fn new(backend: Box<dyn PlayerBackend>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            status: PlaybackStatus::Idle,
            active: None,
            volume: Volume::default(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the completion-event receiver. Available once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<EngineEvent>> {
        self.events_rx.take()
    }

    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// URI of the media currently held, if any.
    #[must_use]
    pub fn active_uri(&self) -> Option<&MediaUri> {
        self.active.as_ref().map(|active| &active.uri)
    }

    /// Volume the engine is applying to the active player.
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Position of the active media, zero when nothing is held.
    #[must_use]
    pub fn position(&self) -> Duration {
        self.active
            .as_ref()
            .map_or(Duration::ZERO, |active| active.handle.position())
    }

    /// Loads and starts playing `uri` from position zero.
    ///
    /// Any previously held player resource is released first, whatever
    /// state the engine was in. On open failure the engine holds nothing
    /// and reports `Idle`.
    pub fn play(&mut self, uri: &MediaUri) -> std::result::Result<(), PlaybackError> {
        self.release_active();
        match self.backend.open(uri) {
            Ok(mut handle) => {
                handle.set_volume(self.volume);
                handle.resume();
                self.active = Some(ActiveMedia {
                    uri: uri.clone(),
                    handle,
                });
                self.status = PlaybackStatus::Playing;
                tracing::debug!(uri = %uri, "playback started");
                Ok(())
            }
            Err(err) => {
                self.status = PlaybackStatus::Idle;
                tracing::warn!(uri = %uri, error = %err, "failed to open media source");
                Err(err)
            }
        }
    }

    /// Toggles between playing and paused, retaining the position.
    ///
    /// With nothing loaded (`Idle`/`Stopped`) this fails with
    /// [`PlaybackError::NoActiveMedia`] and the state is unchanged.
    pub fn toggle_play_pause(
        &mut self,
    ) -> std::result::Result<PlaybackStatus, PlaybackError> {
        match self.status {
            PlaybackStatus::Playing => {
                if let Some(active) = self.active.as_mut() {
                    active.handle.pause();
                }
                self.status = PlaybackStatus::Paused;
                Ok(self.status)
            }
            PlaybackStatus::Paused => {
                if let Some(active) = self.active.as_mut() {
                    active.handle.resume();
                }
                self.status = PlaybackStatus::Playing;
                Ok(self.status)
            }
            PlaybackStatus::Idle | PlaybackStatus::Stopped => {
                Err(PlaybackError::NoActiveMedia)
            }
        }
    }

    /// Stops playback and releases the player resource; position resets to
    /// zero. Already idle/stopped engines are left untouched.
    pub fn stop(&mut self) {
        if self.status.has_active_media() {
            self.release_active();
            self.status = PlaybackStatus::Stopped;
            tracing::debug!("playback stopped");
        }
    }

    /// Seeks within the active media, clamped to its duration.
    pub fn seek(&mut self, position: Duration) -> std::result::Result<(), PlaybackError> {
        match self.active.as_mut() {
            Some(active) => {
                active.handle.seek(position);
                Ok(())
            }
            None => Err(PlaybackError::NoActiveMedia),
        }
    }

    /// Applies an already-clamped volume to the active player.
    ///
    /// A no-op while `Idle`; in `Stopped` the value is retained and applied
    /// to the next source.
    pub fn set_volume(&mut self, volume: Volume) {
        if self.status.is_idle() {
            return;
        }
        self.volume = volume;
        if let Some(active) = self.active.as_mut() {
            active.handle.set_volume(volume);
        }
    }

    /// Detects natural end-of-media: transitions `Playing → Stopped`,
    /// releases the handle and emits [`EngineEvent::Completed`].
    pub fn poll_progress(&mut self) -> Option<EngineEvent> {
        if !self.status.is_playing() {
            return None;
        }
        let finished = self
            .active
            .as_ref()
            .is_some_and(|active| active.handle.is_finished());
        if !finished {
            return None;
        }

        let uri = self.active.as_ref().map(|active| active.uri.clone())?;
        self.release_active();
        self.status = PlaybackStatus::Stopped;
        tracing::info!(uri = %uri, "playback completed");

        let event = EngineEvent::Completed { uri };
        let _ = self.events_tx.send(event.clone());
        Some(event)
    }

    /// Releases the held player resource. Idempotent.
    fn release_active(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.handle.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::backend::ClockBackend;

    fn uri(raw: &str) -> MediaUri {
        MediaUri::new(raw).unwrap()
    }

    fn engine_with(sources: &[(&str, u64)]) -> PlaybackEngine {
        let backend = ClockBackend::with_sources(
            sources
                .iter()
                .map(|&(raw, secs)| (uri(raw), Duration::from_secs(secs))),
        );
        PlaybackEngine::new(Box::new(backend))
    }

    #[test]
    fn new_engine_starts_idle() {
        let engine = engine_with(&[]);
        assert_eq!(engine.status(), PlaybackStatus::Idle);
        assert_eq!(engine.active_uri(), None);
        assert_eq!(engine.position(), Duration::ZERO);
    }

    #[test]
    fn play_valid_uri_starts_at_zero() {
        let mut engine = engine_with(&[("a.mp3", 60)]);

        engine.play(&uri("a.mp3")).unwrap();

        assert_eq!(engine.status(), PlaybackStatus::Playing);
        assert_eq!(engine.active_uri(), Some(&uri("a.mp3")));
        assert!(engine.position() < Duration::from_secs(1));
    }

    #[test]
    fn play_unknown_uri_fails_and_leaves_engine_idle() {
        let mut engine = engine_with(&[("a.mp3", 60)]);

        let err = engine.play(&uri("missing.mp3")).unwrap_err();

        assert_eq!(
            err,
            PlaybackError::SourceUnavailable("missing.mp3".to_string())
        );
        assert_eq!(engine.status(), PlaybackStatus::Idle);
        assert_eq!(engine.active_uri(), None);
    }

    #[test]
    fn failed_play_releases_the_previous_source() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        engine.play(&uri("a.mp3")).unwrap();

        let _ = engine.play(&uri("missing.mp3"));

        assert_eq!(engine.status(), PlaybackStatus::Idle);
        assert_eq!(engine.active_uri(), None);
    }

    #[test]
    fn toggle_pauses_and_resumes_retaining_position() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        engine.play(&uri("a.mp3")).unwrap();
        engine.seek(Duration::from_secs(12)).unwrap();

        let paused = engine.toggle_play_pause().unwrap();
        assert_eq!(paused, PlaybackStatus::Paused);
        let held = engine.position();
        assert!(held >= Duration::from_secs(12));

        let resumed = engine.toggle_play_pause().unwrap();
        assert_eq!(resumed, PlaybackStatus::Playing);
        // Position resumed, not reset.
        assert!(engine.position() >= held);
    }

    #[test]
    fn toggle_with_nothing_loaded_reports_no_active_media() {
        let mut engine = engine_with(&[]);

        let err = engine.toggle_play_pause().unwrap_err();

        assert_eq!(err, PlaybackError::NoActiveMedia);
        assert_eq!(engine.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn toggle_after_stop_reports_no_active_media() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        engine.play(&uri("a.mp3")).unwrap();
        engine.stop();

        let err = engine.toggle_play_pause().unwrap_err();

        assert_eq!(err, PlaybackError::NoActiveMedia);
        assert_eq!(engine.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn stop_releases_resource_and_resets_position() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        engine.play(&uri("a.mp3")).unwrap();
        engine.seek(Duration::from_secs(30)).unwrap();

        engine.stop();

        assert_eq!(engine.status(), PlaybackStatus::Stopped);
        assert_eq!(engine.active_uri(), None);
        assert_eq!(engine.position(), Duration::ZERO);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        engine.play(&uri("a.mp3")).unwrap();

        engine.stop();
        engine.stop();

        assert_eq!(engine.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn stop_then_play_restarts_at_zero() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        engine.play(&uri("a.mp3")).unwrap();
        engine.seek(Duration::from_secs(40)).unwrap();
        engine.stop();

        engine.play(&uri("a.mp3")).unwrap();

        assert_eq!(engine.status(), PlaybackStatus::Playing);
        assert!(engine.position() < Duration::from_secs(1));
    }

    #[test]
    fn playing_a_second_uri_replaces_the_first() {
        let mut engine = engine_with(&[("a.mp3", 60), ("b.mp4", 120)]);
        engine.play(&uri("a.mp3")).unwrap();
        engine.seek(Duration::from_secs(20)).unwrap();

        engine.play(&uri("b.mp4")).unwrap();

        assert_eq!(engine.status(), PlaybackStatus::Playing);
        assert_eq!(engine.active_uri(), Some(&uri("b.mp4")));
        assert!(engine.position() < Duration::from_secs(1));
    }

    #[test]
    fn set_volume_is_a_noop_while_idle() {
        let mut engine = engine_with(&[]);
        engine.set_volume(Volume::new(0.9));
        assert_eq!(engine.volume(), Volume::default());
    }

    #[test]
    fn volume_persists_across_source_changes() {
        let mut engine = engine_with(&[("a.mp3", 60), ("b.mp4", 120)]);
        engine.play(&uri("a.mp3")).unwrap();
        engine.set_volume(Volume::new(0.25));

        engine.play(&uri("b.mp4")).unwrap();

        assert_eq!(engine.volume(), Volume::new(0.25));
    }

    #[test]
    fn seek_without_media_reports_no_active_media() {
        let mut engine = engine_with(&[]);
        let err = engine.seek(Duration::from_secs(5)).unwrap_err();
        assert_eq!(err, PlaybackError::NoActiveMedia);
    }

    #[test]
    fn natural_end_transitions_to_stopped_and_emits_completion() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        let mut events = engine.take_events().unwrap();

        engine.play(&uri("a.mp3")).unwrap();
        engine.seek(Duration::from_secs(60)).unwrap();

        let event = engine.poll_progress().expect("completion not detected");
        assert_eq!(
            event,
            EngineEvent::Completed {
                uri: uri("a.mp3")
            }
        );
        assert_eq!(engine.status(), PlaybackStatus::Stopped);
        assert_eq!(engine.active_uri(), None);

        // The same event is delivered on the notification channel.
        assert_eq!(
            events.try_recv().unwrap(),
            EngineEvent::Completed {
                uri: uri("a.mp3")
            }
        );
    }

    #[test]
    fn poll_progress_is_quiet_mid_stream() {
        let mut engine = engine_with(&[("a.mp3", 60)]);
        engine.play(&uri("a.mp3")).unwrap();

        assert_eq!(engine.poll_progress(), None);
        assert_eq!(engine.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn poll_progress_ignores_paused_media() {
        let mut engine = engine_with(&[("a.mp3", 1)]);
        engine.play(&uri("a.mp3")).unwrap();
        engine.seek(Duration::from_secs(1)).unwrap();
        engine.toggle_play_pause().unwrap();

        assert_eq!(engine.poll_progress(), None);
        assert_eq!(engine.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn take_events_is_available_once() {
        let mut engine = engine_with(&[]);
        assert!(engine.take_events().is_some());
        assert!(engine.take_events().is_none());
    }
}
