// SPDX-License-Identifier: MPL-2.0
//! Capture flow: planning target files for the platform camera/microphone
//! and feeding completed captures into the media catalog.
//!
//! The platform capture surface (camera UI, system recorder) sits behind
//! [`CaptureSurface`]; this module only owns the file naming convention,
//! the plan handed to the surface, and the catalog insert on success.

mod recorder;

pub use recorder::{AudioRecorder, ClockRecorderBackend, RecordedClip, RecorderBackend};

use crate::catalog::MediaCatalog;
use crate::domain::{MediaItem, MediaType, MediaUri};
use crate::error::{CaptureError, Error, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name for a capture started at `timestamp`, e.g.
/// `AUDIO_20260805_143022.mp3` or `IMAGE_20260805_143022.jpg`.
#[must_use]
pub fn capture_file_name(media_type: MediaType, timestamp: DateTime<Utc>) -> String {
    format!(
        "{}_{}{}",
        media_type.label(),
        timestamp.format("%Y%m%d_%H%M%S"),
        media_type.file_extension()
    )
}

/// Target of a pending capture: what kind of media and where the surface
/// should write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturePlan {
    media_type: MediaType,
    path: PathBuf,
}

impl CapturePlan {
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Plans a capture into `base_dir` using the timestamped naming scheme.
#[must_use]
pub fn plan_capture(base_dir: &Path, media_type: MediaType, now: DateTime<Utc>) -> CapturePlan {
    CapturePlan {
        media_type,
        path: base_dir.join(capture_file_name(media_type, now)),
    }
}

/// Platform surface that performs the actual capture (camera, recorder UI).
///
/// Implementations write the captured media to `plan.path()` and return
/// `Ok` only when the file exists; a user cancel or device failure is an
/// error and nothing reaches the catalog.
pub trait CaptureSurface {
    fn capture(&mut self, plan: &CapturePlan) -> Result<()>;
}

/// Inserts a completed capture into the catalog and returns the new item.
///
/// `duration` is kept for audio/video and dropped for images. The capture
/// file must exist by the time this is called.
pub fn complete_capture(
    plan: &CapturePlan,
    duration: Option<Duration>,
    recorded_at: DateTime<Utc>,
    catalog: &mut MediaCatalog,
) -> Result<MediaItem> {
    let name = plan
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Capture(CaptureError::Backend(format!(
                "capture path has no file name: {}",
                plan.path.display()
            )))
        })?;
    let uri = MediaUri::new(plan.path.to_string_lossy()).ok_or_else(|| {
        Error::Capture(CaptureError::Backend("capture path is empty".to_string()))
    })?;

    let item = MediaItem::new(
        catalog.next_id(),
        name,
        uri,
        plan.media_type,
        duration,
        recorded_at,
    );
    catalog.insert(item.clone())?;
    tracing::info!(
        id = item.id(),
        kind = plan.media_type.label(),
        "capture completed"
    );
    Ok(item)
}
