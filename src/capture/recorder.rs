// SPDX-License-Identifier: MPL-2.0
//! Audio recorder state machine.
//!
//! The recorder is a strict two-state machine (idle / recording) wrapped
//! around a [`RecorderBackend`] that does the platform work. Starting while
//! recording and stopping while idle are caller errors surfaced as
//! [`CaptureError`](crate::error::CaptureError), never panics. Recording
//! and playback are independent resources; the recorder takes no lock
//! shared with the playback engine.

use crate::error::{CaptureError, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Platform microphone/encoder seam.
pub trait RecorderBackend: Send {
    /// Starts writing a recording to `path`.
    fn begin(&mut self, path: &Path) -> Result<()>;

    /// Finalizes the recording and returns the clip duration.
    fn finish(&mut self) -> Result<Duration>;
}

/// A finished recording, ready for the catalog insert path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedClip {
    pub path: PathBuf,
    pub duration: Duration,
}

enum RecorderState {
    Idle,
    Recording { path: PathBuf },
}

/// Audio capture front-end used by the recording screen flow.
pub struct AudioRecorder {
    backend: Box<dyn RecorderBackend>,
    state: RecorderState,
}

impl AudioRecorder {
    #[must_use]
    pub fn new(backend: Box<dyn RecorderBackend>) -> Self {
        Self {
            backend,
            state: RecorderState::Idle,
        }
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording { .. })
    }

    /// Starts recording into `path`.
    pub fn start(&mut self, path: PathBuf) -> Result<()> {
        if self.is_recording() {
            return Err(Error::Capture(CaptureError::AlreadyRecording));
        }
        self.backend.begin(&path)?;
        tracing::debug!(path = %path.display(), "recording started");
        self.state = RecorderState::Recording { path };
        Ok(())
    }

    /// Stops the recording and returns the finished clip.
    pub fn stop(&mut self) -> Result<RecordedClip> {
        match std::mem::replace(&mut self.state, RecorderState::Idle) {
            RecorderState::Idle => Err(Error::Capture(CaptureError::NotRecording)),
            RecorderState::Recording { path } => {
                let duration = self.backend.finish()?;
                tracing::info!(path = %path.display(), secs = duration.as_secs_f64(), "recording stopped");
                Ok(RecordedClip { path, duration })
            }
        }
    }
}

/// Backend stand-in that creates the clip file and measures its length
/// with the wall clock, so the full recording flow runs without device
/// audio hardware.
#[derive(Debug, Default)]
pub struct ClockRecorderBackend {
    started: Option<Instant>,
}

impl ClockRecorderBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecorderBackend for ClockRecorderBackend {
    fn begin(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::File::create(path)?;
        self.started = Some(Instant::now());
        Ok(())
    }

    fn finish(&mut self) -> Result<Duration> {
        self.started
            .take()
            .map(|started| started.elapsed())
            .ok_or_else(|| {
                Error::Capture(CaptureError::Backend(
                    "finish called before begin".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn start_then_stop_yields_a_clip() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("AUDIO_20260805_120000.mp3");
        let mut recorder = AudioRecorder::new(Box::new(ClockRecorderBackend::new()));

        recorder.start(path.clone()).unwrap();
        assert!(recorder.is_recording());
        assert!(path.exists());

        let clip = recorder.stop().unwrap();
        assert_eq!(clip.path, path);
        assert!(!recorder.is_recording());
    }

    #[test]
    fn double_start_is_rejected() {
        let dir = tempdir().expect("failed to create temp dir");
        let mut recorder = AudioRecorder::new(Box::new(ClockRecorderBackend::new()));

        recorder.start(dir.path().join("a.mp3")).unwrap();
        let err = recorder.start(dir.path().join("b.mp3")).unwrap_err();
        assert!(matches!(
            err,
            Error::Capture(CaptureError::AlreadyRecording)
        ));
        // The first recording is still in progress.
        assert!(recorder.is_recording());
    }

    #[test]
    fn stop_while_idle_is_rejected() {
        let mut recorder = AudioRecorder::new(Box::new(ClockRecorderBackend::new()));
        let err = recorder.stop().unwrap_err();
        assert!(matches!(err, Error::Capture(CaptureError::NotRecording)));
    }
}
