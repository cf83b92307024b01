// SPDX-License-Identifier: MPL-2.0
//! Demo session: records a clip, catalogs it, and plays it back while a
//! replayed tilt sweep drives the volume.

use std::error::Error;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tiltdeck::capture::{
    complete_capture, plan_capture, AudioRecorder, ClockRecorderBackend,
};
use tiltdeck::catalog::MediaCatalog;
use tiltdeck::config::TomlSettingsStore;
use tiltdeck::domain::MediaType;
use tiltdeck::playback::{ClockBackend, PlaybackController, TiltVolumeMapper, Volume};
use tiltdeck::sensor::ReplaySensor;
use tracing_subscriber::EnvFilter;

struct Flags {
    /// Simulated length of the demo media, in seconds.
    seconds: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tiltdeck=info")),
        )
        .init();

    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        seconds: args.opt_value_from_str("--seconds")?.unwrap_or(8),
    };
    let _ = args.finish();

    let session_dir = std::env::temp_dir().join("tiltdeck-demo");
    std::fs::create_dir_all(&session_dir)?;

    // Record a short clip through the capture flow.
    let mut catalog = MediaCatalog::in_memory();
    let plan = plan_capture(&session_dir, MediaType::Audio, Utc::now());
    let mut recorder = AudioRecorder::new(Box::new(ClockRecorderBackend::new()));
    recorder.start(plan.path().to_path_buf())?;
    thread::sleep(Duration::from_millis(250));
    let clip = recorder.stop()?;
    let item = complete_capture(&plan, Some(clip.duration), Utc::now(), &mut catalog)?;
    tracing::info!(name = item.name(), "clip recorded and cataloged");

    // Register the clip as a playable source with the demo length.
    let mut backend = ClockBackend::new();
    backend.register(item.uri(), Duration::from_secs(flags.seconds));

    // Tilt sweep: flat-to-flat roll and back, repeated.
    let mut sweep: Vec<f32> = (-20..=20).map(|step| step as f32 * 0.5).collect();
    sweep.extend(sweep.clone().into_iter().rev());
    let sensor = ReplaySensor::new(sweep).repeating();

    let settings_path = session_dir.join("settings.toml");
    let config = if settings_path.exists() {
        tiltdeck::config::load_from_path(&settings_path).unwrap_or_default()
    } else {
        tiltdeck::config::Config::default()
    };
    let settings = TomlSettingsStore::at_path(settings_path);
    let controller = PlaybackController::with_mapper(
        Box::new(backend),
        Box::new(sensor),
        Box::new(settings),
        TiltVolumeMapper::from_config(&config),
    );

    if !controller.snapshot().accelerometer_enabled {
        controller.toggle_accelerometer();
    }
    controller.play_media(item.uri())?;

    let mut tick = 0u64;
    loop {
        thread::sleep(Duration::from_millis(500));
        controller.poll();
        let snapshot = controller.snapshot();
        tracing::info!(
            status = ?snapshot.status,
            volume = %Volume::new(snapshot.volume),
            position_ms = snapshot.position.as_millis() as u64,
            "tick"
        );
        if snapshot.status.is_stopped() {
            tracing::info!("media completed");
            break;
        }

        tick += 1;
        match tick {
            4 => {
                tracing::info!("pausing");
                controller.toggle_play_pause()?;
            }
            6 => {
                tracing::info!("resuming");
                controller.toggle_play_pause()?;
            }
            _ => {}
        }
        // Bounded run even if completion detection is disturbed.
        if tick > flags.seconds * 2 + 8 {
            break;
        }
    }

    controller.shutdown();
    Ok(())
}
