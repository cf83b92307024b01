// SPDX-License-Identifier: MPL-2.0
//! Tilt sensor seam.
//!
//! The platform accelerometer sits behind [`SensorSource`]: a push-based,
//! infinite stream of raw tilt samples delivered while a subscription is
//! active. The playback controller subscribes only while volume control is
//! enabled and playback is running, and unsubscribes on pause/stop/disable
//! to release the sensor.
//!
//! Cancellation contract: after [`SensorSubscription::cancel`] returns, the
//! producer must stop delivering into the sink. Sources must also never
//! deliver synchronously from inside `subscribe` — the controller calls
//! `subscribe` while holding its state lock.

mod replay;

pub use replay::ReplaySensor;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One raw reading from the tilt axis used for volume control, in m/s².
/// Unbounded; typical devices report roughly [-10, 10].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSample {
    pub axis_ms2: f32,
}

impl TiltSample {
    #[must_use]
    pub fn new(axis_ms2: f32) -> Self {
        Self { axis_ms2 }
    }
}

/// Sensor-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The device has no usable tilt sensor.
    Unavailable,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Unavailable => write!(f, "tilt sensor unavailable"),
        }
    }
}

impl std::error::Error for SensorError {}

/// Destination for sensor samples, handed to a source on subscribe.
#[derive(Clone)]
pub struct SampleSink {
    callback: Arc<dyn Fn(TiltSample) + Send + Sync>,
}

impl SampleSink {
    #[must_use]
    pub fn new(callback: impl Fn(TiltSample) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub fn deliver(&self, sample: TiltSample) {
        (self.callback)(sample);
    }
}

impl fmt::Debug for SampleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleSink").finish()
    }
}

/// Push-based source of tilt samples.
pub trait SensorSource: Send {
    /// Starts delivering samples into `sink` until the returned
    /// subscription is cancelled or dropped.
    fn subscribe(
        &mut self,
        sink: SampleSink,
    ) -> std::result::Result<SensorSubscription, SensorError>;
}

/// Active sensor subscription; cancelling (or dropping) stops delivery.
#[derive(Debug)]
pub struct SensorSubscription {
    active: Arc<AtomicBool>,
}

impl SensorSubscription {
    /// Creates a subscription around the shared active flag the producer
    /// checks before each delivery.
    #[must_use]
    pub fn new(active: Arc<AtomicBool>) -> Self {
        Self { active }
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for SensorSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Source modelling a device without the required sensor: every subscribe
/// attempt fails with [`SensorError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSensor;

impl SensorSource for UnavailableSensor {
    fn subscribe(
        &mut self,
        _sink: SampleSink,
    ) -> std::result::Result<SensorSubscription, SensorError> {
        Err(SensorError::Unavailable)
    }
}
