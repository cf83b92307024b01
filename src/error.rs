// SPDX-License-Identifier: MPL-2.0
use std::fmt;

/// Crate-wide error type.
#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Catalog(String),
    Capture(CaptureError),
    Playback(PlaybackError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Specific error types for playback control.
///
/// These are surfaced to the presentation layer as observable status rather
/// than crossing component boundaries as panics; none of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The URI cannot be opened or played (missing, unreadable, unknown).
    /// The engine stays in (or returns to) the idle state.
    SourceUnavailable(String),

    /// A control operation was invoked with nothing loaded.
    /// Treated as a no-op by callers; state is left unchanged.
    NoActiveMedia,

    /// The device lacks the required tilt sensor. Accelerometer control
    /// has no effect; volume stays at its last value.
    SensorUnavailable,
}

/// Errors from the capture/recording flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// `start` was called while a recording is already in progress.
    AlreadyRecording,

    /// `stop` was called with no recording in progress.
    NotRecording,

    /// The platform recorder backend failed.
    Backend(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::SourceUnavailable(uri) => {
                write!(f, "media source unavailable: {}", uri)
            }
            PlaybackError::NoActiveMedia => write!(f, "no active media"),
            PlaybackError::SensorUnavailable => write!(f, "tilt sensor unavailable"),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::AlreadyRecording => write!(f, "a recording is already in progress"),
            CaptureError::NotRecording => write!(f, "no recording in progress"),
            CaptureError::Backend(msg) => write!(f, "recorder backend error: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Config(e) => write!(f, "configuration error: {}", e),
            Error::Catalog(e) => write!(f, "media catalog error: {}", e),
            Error::Capture(e) => write!(f, "capture error: {}", e),
            Error::Playback(e) => write!(f, "playback error: {}", e),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for PlaybackError {}
impl std::error::Error for CaptureError {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<PlaybackError> for Error {
    fn from(err: PlaybackError) -> Self {
        Error::Playback(err)
    }
}

impl From<CaptureError> for Error {
    fn from(err: CaptureError) -> Self {
        Error::Capture(err)
    }
}
