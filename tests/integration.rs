// SPDX-License-Identifier: MPL-2.0
//! End-to-end flows: capture → catalog → playback with tilt-driven volume,
//! and preference durability across simulated restarts.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tempfile::tempdir;
use tiltdeck::capture::{
    complete_capture, plan_capture, AudioRecorder, ClockRecorderBackend,
};
use tiltdeck::catalog::MediaCatalog;
use tiltdeck::config::{SettingsStore, TomlSettingsStore};
use tiltdeck::domain::{MediaType, MediaUri};
use tiltdeck::playback::{ClockBackend, PlaybackController, PlaybackStatus};
use tiltdeck::sensor::{SampleSink, SensorError, SensorSource, SensorSubscription, TiltSample};

/// Sensor whose sink is captured so tests can pump samples by hand.
#[derive(Default)]
struct ManualSensor {
    slot: Arc<Mutex<Option<SampleSink>>>,
}

impl ManualSensor {
    fn handle(&self) -> Arc<Mutex<Option<SampleSink>>> {
        Arc::clone(&self.slot)
    }
}

impl SensorSource for ManualSensor {
    fn subscribe(&mut self, sink: SampleSink) -> Result<SensorSubscription, SensorError> {
        *self.slot.lock().unwrap() = Some(sink);
        Ok(SensorSubscription::new(Arc::new(AtomicBool::new(true))))
    }
}

#[test]
fn recorded_clip_plays_back_with_tilt_controlled_volume() {
    let dir = tempdir().expect("failed to create temp dir");

    // Record a clip through the capture flow and catalog it.
    let (mut catalog, warning) = MediaCatalog::open(dir.path().join("catalog.cbor"));
    assert!(warning.is_none());

    let plan = plan_capture(dir.path(), MediaType::Audio, Utc::now());
    let mut recorder = AudioRecorder::new(Box::new(ClockRecorderBackend::new()));
    recorder.start(plan.path().to_path_buf()).unwrap();
    let clip = recorder.stop().unwrap();
    let item = complete_capture(&plan, Some(clip.duration), Utc::now(), &mut catalog).unwrap();

    assert!(plan.path().exists());
    assert_eq!(catalog.query_by_type(MediaType::Audio).count(), 1);

    // Play it back with the sensor driving the volume.
    let mut backend = ClockBackend::new();
    backend.register(item.uri(), Duration::from_secs(30));

    let sensor = ManualSensor::default();
    let slot = sensor.handle();
    let controller = PlaybackController::new(
        Box::new(backend),
        Box::new(sensor),
        Box::new(TomlSettingsStore::at_path(dir.path().join("settings.toml"))),
    );

    controller.toggle_accelerometer();
    controller.play_media(item.uri()).unwrap();
    assert!(controller.snapshot().is_playing);

    // Full starboard tilt pushes the smoothed volume upward, sample by
    // sample, and never past 1.0.
    let sink = slot.lock().unwrap().clone().expect("sensor not subscribed");
    let mut previous = controller.snapshot().volume;
    for _ in 0..200 {
        sink.deliver(TiltSample::new(10.0));
        let current = controller.snapshot().volume;
        assert!(current >= previous);
        assert!(current <= 1.0);
        previous = current;
    }
    assert!(previous > 0.99);

    controller.shutdown();
    assert_eq!(controller.snapshot().status, PlaybackStatus::Stopped);
}

#[test]
fn accelerometer_preference_survives_a_restart() {
    let dir = tempdir().expect("failed to create temp dir");
    let settings_path = dir.path().join("settings.toml");

    // First session: enable tilt control.
    {
        let backend = ClockBackend::new();
        let controller = PlaybackController::new(
            Box::new(backend),
            Box::new(ManualSensor::default()),
            Box::new(TomlSettingsStore::at_path(settings_path.clone())),
        );
        assert!(!controller.snapshot().accelerometer_enabled);
        assert!(controller.toggle_accelerometer());
        controller.shutdown();
    }

    // Second session: the flag is seeded from the persisted store.
    {
        let backend = ClockBackend::new();
        let controller = PlaybackController::new(
            Box::new(backend),
            Box::new(ManualSensor::default()),
            Box::new(TomlSettingsStore::at_path(settings_path.clone())),
        );
        assert!(controller.snapshot().accelerometer_enabled);

        // Toggling off persists too.
        assert!(!controller.toggle_accelerometer());
    }

    let store = TomlSettingsStore::at_path(settings_path);
    assert!(!store.accelerometer_enabled());
}

#[test]
fn catalog_survives_a_restart_with_capture_order_intact() {
    let dir = tempdir().expect("failed to create temp dir");
    let catalog_path = dir.path().join("catalog.cbor");

    {
        let (mut catalog, _) = MediaCatalog::open(catalog_path.clone());
        for media_type in [MediaType::Audio, MediaType::Image, MediaType::Video] {
            let plan = plan_capture(dir.path(), media_type, Utc::now());
            std::fs::write(plan.path(), b"").unwrap();
            let duration = media_type
                .has_duration()
                .then(|| Duration::from_secs(5));
            complete_capture(&plan, duration, Utc::now(), &mut catalog).unwrap();
        }
    }

    let (catalog, warning) = MediaCatalog::open(catalog_path);
    assert!(warning.is_none());
    assert_eq!(catalog.len(), 3);
    let ids: Vec<u64> = catalog.items().iter().map(|item| item.id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(catalog.query_by_type(MediaType::Image).count(), 1);
    assert_eq!(
        catalog.query_by_type(MediaType::Image).next().unwrap().duration(),
        None
    );
}

#[test]
fn replacing_the_active_source_restarts_from_zero() {
    let a = MediaUri::new("session/a.mp3").unwrap();
    let b = MediaUri::new("session/b.mp4").unwrap();
    let backend = ClockBackend::with_sources([
        (a.clone(), Duration::from_secs(60)),
        (b.clone(), Duration::from_secs(90)),
    ]);
    let controller = PlaybackController::new(
        Box::new(backend),
        Box::new(ManualSensor::default()),
        Box::new(tiltdeck::config::MemorySettingsStore::default()),
    );

    controller.play_media(&a).unwrap();
    controller.play_media(&b).unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.active_uri, Some(b));
    assert!(snapshot.is_playing);
    assert!(snapshot.position < Duration::from_secs(1));
}
