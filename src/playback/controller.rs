// SPDX-License-Identifier: MPL-2.0
//! Playback controller: orchestrates sensor → mapper → engine.
//!
//! All state mutations — user-initiated operations, asynchronous sensor
//! samples and progress polls — funnel through one mutex around the
//! controller's inner state, so a sensor-driven volume update and a
//! user-driven toggle never interleave inconsistently.
//!
//! Observable state is published on a `tokio::sync::watch` channel:
//! consumers either poll [`PlaybackController::snapshot`] or hold a
//! receiver from [`PlaybackController::watch`] and react to changes. The
//! controller is constructed once at session start and torn down with
//! [`PlaybackController::shutdown`], which releases the sensor
//! subscription and the player resource.

use super::backend::PlayerBackend;
use super::engine::{EngineEvent, PlaybackEngine};
use super::mapper::TiltVolumeMapper;
use super::state::PlaybackStatus;
use crate::config::SettingsStore;
use crate::domain::MediaUri;
use crate::error::PlaybackError;
use crate::sensor::{SampleSink, SensorError, SensorSource, SensorSubscription, TiltSample};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Point-in-time view of the controller, published on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub status: PlaybackStatus,
    pub is_playing: bool,
    pub active_uri: Option<MediaUri>,
    pub position: Duration,
    pub volume: f32,
    pub accelerometer_enabled: bool,
    pub last_error: Option<PlaybackError>,
}

struct ControllerInner {
    engine: PlaybackEngine,
    mapper: TiltVolumeMapper,
    settings: Box<dyn SettingsStore>,
    sensor: Box<dyn SensorSource>,
    subscription: Option<SensorSubscription>,
    /// Bumped on every (re)subscribe; samples stamped with an older epoch
    /// are discarded, so a callback that was already in flight when the
    /// subscription ended can never mutate state.
    epoch: u64,
    accelerometer_enabled: bool,
    last_error: Option<PlaybackError>,
    completion_events: Option<mpsc::UnboundedReceiver<EngineEvent>>,
}

struct ControllerShared {
    inner: Mutex<ControllerInner>,
    snapshot_tx: watch::Sender<ControllerSnapshot>,
}

/// Session-scoped owner of the playback engine, volume mapper and sensor
/// subscription.
pub struct PlaybackController {
    shared: Arc<ControllerShared>,
}

impl PlaybackController {
    /// Builds a controller over the given collaborators, seeding the
    /// accelerometer flag from the settings store.
    #[must_use]
    pub fn new(
        backend: Box<dyn PlayerBackend>,
        sensor: Box<dyn SensorSource>,
        settings: Box<dyn SettingsStore>,
    ) -> Self {
        Self::with_mapper(backend, sensor, settings, TiltVolumeMapper::default())
    }

    /// Like [`PlaybackController::new`], with explicit mapper tunables.
    #[must_use]
    pub fn with_mapper(
        backend: Box<dyn PlayerBackend>,
        sensor: Box<dyn SensorSource>,
        settings: Box<dyn SettingsStore>,
        mapper: TiltVolumeMapper,
    ) -> Self {
        let accelerometer_enabled = settings.accelerometer_enabled();
        let mut engine = PlaybackEngine::new(backend);
        let completion_events = engine.take_events();

        let inner = ControllerInner {
            engine,
            mapper,
            settings,
            sensor,
            subscription: None,
            epoch: 0,
            accelerometer_enabled,
            last_error: None,
            completion_events,
        };
        let (snapshot_tx, _) = watch::channel(snapshot_of(&inner));

        Self {
            shared: Arc::new(ControllerShared {
                inner: Mutex::new(inner),
                snapshot_tx,
            }),
        }
    }

    /// Starts playback of `uri` and, when volume control is enabled,
    /// (re)subscribes the tilt sensor.
    pub fn play_media(&self, uri: &MediaUri) -> std::result::Result<(), PlaybackError> {
        let mut inner = self.shared.lock_inner();
        let result = inner.engine.play(uri);
        match &result {
            Ok(()) => {
                inner.last_error = None;
                if inner.accelerometer_enabled {
                    ControllerShared::resubscribe(&self.shared, &mut inner);
                }
            }
            Err(err) => {
                inner.last_error = Some(err.clone());
                unsubscribe(&mut inner);
            }
        }
        self.shared.publish(&inner);
        result
    }

    /// Toggles play/pause and matches the sensor subscription to the
    /// resulting state.
    pub fn toggle_play_pause(&self) -> std::result::Result<(), PlaybackError> {
        let mut inner = self.shared.lock_inner();
        let result = match inner.engine.toggle_play_pause() {
            Ok(PlaybackStatus::Playing) => {
                inner.last_error = None;
                if inner.accelerometer_enabled && inner.subscription.is_none() {
                    ControllerShared::resubscribe(&self.shared, &mut inner);
                }
                Ok(())
            }
            Ok(_) => {
                inner.last_error = None;
                unsubscribe(&mut inner);
                Ok(())
            }
            Err(err) => {
                inner.last_error = Some(err.clone());
                Err(err)
            }
        };
        self.shared.publish(&inner);
        result
    }

    /// Stops playback, releasing the player resource and the sensor
    /// subscription.
    pub fn stop(&self) {
        let mut inner = self.shared.lock_inner();
        unsubscribe(&mut inner);
        inner.engine.stop();
        inner.mapper.reset();
        self.shared.publish(&inner);
    }

    /// Flips the accelerometer-control flag, persists it, and brings the
    /// sensor subscription in line. Returns the new flag value.
    ///
    /// A missing sensor does not crash: the preference is still persisted
    /// and the volume simply stays where it is.
    pub fn toggle_accelerometer(&self) -> bool {
        let mut inner = self.shared.lock_inner();
        let enabled = !inner.accelerometer_enabled;
        inner.accelerometer_enabled = enabled;
        if let Err(err) = inner.settings.set_accelerometer_enabled(enabled) {
            tracing::warn!(error = %err, "failed to persist accelerometer preference");
        }
        if enabled {
            inner.last_error = None;
            if inner.engine.status().is_playing() {
                ControllerShared::resubscribe(&self.shared, &mut inner);
            }
        } else {
            unsubscribe(&mut inner);
            inner.mapper.reset();
        }
        tracing::debug!(enabled, "accelerometer control toggled");
        self.shared.publish(&inner);
        enabled
    }

    /// Drives end-of-media detection; call periodically while playing.
    pub fn poll(&self) {
        let mut inner = self.shared.lock_inner();
        if let Some(EngineEvent::Completed { uri }) = inner.engine.poll_progress() {
            tracing::debug!(uri = %uri, "completion observed, sensor released");
            unsubscribe(&mut inner);
            inner.mapper.reset();
        }
        self.shared.publish(&inner);
    }

    /// Current state; also the value a fresh watcher sees first.
    #[must_use]
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Change-notification stream of controller state.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<ControllerSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Takes the engine's completion-event receiver. Available once.
    pub fn take_completion_events(&self) -> Option<mpsc::UnboundedReceiver<EngineEvent>> {
        self.shared.lock_inner().completion_events.take()
    }

    /// Tears the session down: releases the sensor subscription and the
    /// player resource.
    pub fn shutdown(&self) {
        let mut inner = self.shared.lock_inner();
        unsubscribe(&mut inner);
        inner.engine.stop();
        inner.mapper.reset();
        self.shared.publish(&inner);
        tracing::debug!("playback controller shut down");
    }
}

impl ControllerShared {
    /// Recovers from a poisoned lock: every mutation completes under the
    /// guard, so the inner state is still coherent.
    fn lock_inner(&self) -> MutexGuard<'_, ControllerInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn publish(&self, inner: &ControllerInner) {
        self.snapshot_tx.send_replace(snapshot_of(inner));
    }

    /// Replaces any current subscription with a fresh one under a new
    /// epoch. Failure to subscribe is recorded as observable state.
    fn resubscribe(shared: &Arc<ControllerShared>, inner: &mut ControllerInner) {
        unsubscribe(inner);
        inner.epoch = inner.epoch.wrapping_add(1);
        let epoch = inner.epoch;
        let weak: Weak<ControllerShared> = Arc::downgrade(shared);
        let sink = SampleSink::new(move |sample| {
            if let Some(shared) = weak.upgrade() {
                ControllerShared::handle_sample(&shared, epoch, sample);
            }
        });
        match inner.sensor.subscribe(sink) {
            Ok(subscription) => {
                inner.subscription = Some(subscription);
            }
            Err(SensorError::Unavailable) => {
                inner.last_error = Some(PlaybackError::SensorUnavailable);
                tracing::warn!("tilt sensor unavailable, volume control has no effect");
            }
        }
    }

    /// Sensor delivery path: serialized behind the same lock as user
    /// operations, and dropped when stale or out of scope.
    fn handle_sample(shared: &Arc<ControllerShared>, epoch: u64, sample: TiltSample) {
        let mut inner = shared.lock_inner();
        if epoch != inner.epoch
            || !inner.accelerometer_enabled
            || !inner.engine.status().is_playing()
        {
            return;
        }
        let volume = inner.mapper.process(sample);
        inner.engine.set_volume(volume);
        shared.publish(&inner);
    }
}

fn unsubscribe(inner: &mut ControllerInner) {
    if let Some(subscription) = inner.subscription.take() {
        subscription.cancel();
    }
    // Orphan any in-flight callbacks from the old subscription.
    inner.epoch = inner.epoch.wrapping_add(1);
}

fn snapshot_of(inner: &ControllerInner) -> ControllerSnapshot {
    let status = inner.engine.status();
    ControllerSnapshot {
        status,
        is_playing: status.is_playing(),
        active_uri: inner.engine.active_uri().cloned(),
        position: inner.engine.position(),
        volume: inner.engine.volume().value(),
        accelerometer_enabled: inner.accelerometer_enabled,
        last_error: inner.last_error.clone(),
    }
}
