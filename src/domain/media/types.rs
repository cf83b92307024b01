// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Kind of captured media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// Recorded audio clip.
    Audio,
    /// Still photo; carries no duration.
    Image,
    /// Recorded video clip.
    Video,
}

impl MediaType {
    /// Upper-case label used in capture file names (`AUDIO_…`, `IMAGE_…`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MediaType::Audio => "AUDIO",
            MediaType::Image => "IMAGE",
            MediaType::Video => "VIDEO",
        }
    }

    /// File extension the capture flow writes for this kind.
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            MediaType::Audio => ".mp3",
            MediaType::Image => ".jpg",
            MediaType::Video => ".mp4",
        }
    }

    /// Whether items of this kind carry a playback duration.
    #[must_use]
    pub fn has_duration(self) -> bool {
        !matches!(self, MediaType::Image)
    }
}

/// Location of a media source, as handed to the playback engine.
///
/// The wrapped string is whatever the platform uses to address the file
/// (a filesystem path here, a `content://` URI on a device). The newtype
/// only guarantees the value is non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaUri(String);

impl MediaUri {
    /// Creates a URI from a raw string, rejecting empty/blank input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry in the media catalog.
///
/// Items are immutable once created: the capture and recording flows build
/// them, the catalog appends them, and nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    id: u64,
    name: String,
    uri: MediaUri,
    media_type: MediaType,
    duration: Option<Duration>,
    recorded_at: DateTime<Utc>,
}

impl MediaItem {
    /// Creates a new catalog entry.
    ///
    /// Images never carry a duration; a `Some` duration passed for an image
    /// is normalized to `None`.
    #[must_use]
    pub fn new(
        id: u64,
        name: impl Into<String>,
        uri: MediaUri,
        media_type: MediaType,
        duration: Option<Duration>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let duration = if media_type.has_duration() {
            duration
        } else {
            None
        };
        Self {
            id,
            name: name.into(),
            uri,
            media_type,
            duration,
            recorded_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn uri(&self) -> &MediaUri {
        &self.uri
    }

    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
