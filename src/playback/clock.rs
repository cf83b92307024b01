// SPDX-License-Identifier: MPL-2.0
//! Playback position clock.
//!
//! Tracks the position of the active media stream against the wall clock:
//! while running, position interpolates from the monotonic clock; while
//! paused, it freezes at the last value. Fully lock-free, using atomics
//! for all fields, so the engine can read positions from any thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Reference instant for converting `Instant` to/from atomic microseconds.
/// All time measurements are relative to this instant, allowing storage in
/// `AtomicU64`.
static REFERENCE_INSTANT: OnceLock<Instant> = OnceLock::new();

fn instant_to_us(instant: Instant) -> u64 {
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    instant.duration_since(*reference).as_micros() as u64
}

/// Converts microseconds since reference back to an `Instant`.
/// Returns `None` for the sentinel value 0.
fn us_to_instant(us: u64) -> Option<Instant> {
    if us == 0 {
        return None;
    }
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    Some(*reference + Duration::from_micros(us))
}

/// Lock-free position tracker for one media stream.
#[derive(Debug)]
pub struct PositionClock {
    /// Last settled position in microseconds (authoritative while paused).
    position_us: AtomicU64,

    /// Wall-clock reference as microseconds since `REFERENCE_INSTANT`.
    /// 0 means no reference is set.
    start_time_us: AtomicU64,

    /// Position at the wall-clock reference.
    start_position_us: AtomicU64,

    /// Whether the clock is advancing.
    running: AtomicBool,
}

impl Default for PositionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position_us: AtomicU64::new(0),
            start_time_us: AtomicU64::new(0),
            start_position_us: AtomicU64::new(0),
            running: AtomicBool::new(false),
        }
    }

    /// Starts the clock at the given position.
    pub fn start(&self, at: Duration) {
        self.seek(at);
        self.running.store(true, Ordering::SeqCst);
    }

    /// Freezes the clock, settling the interpolated position.
    pub fn pause(&self) {
        let position = self.position();
        self.position_us
            .store(position.as_micros() as u64, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
    }

    /// Resumes advancing from the frozen position.
    pub fn resume(&self) {
        let position_us = self.position_us.load(Ordering::SeqCst);
        self.start_position_us.store(position_us, Ordering::SeqCst);
        self.start_time_us
            .store(instant_to_us(Instant::now()), Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
    }

    /// Stops the clock and resets the position to zero.
    pub fn stop(&self) {
        self.position_us.store(0, Ordering::SeqCst);
        self.start_position_us.store(0, Ordering::SeqCst);
        self.start_time_us.store(0, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
    }

    /// Jumps to a position, keeping the running/paused state.
    ///
    /// Always resets the wall-time reference so the interpolation restarts
    /// from the seek target rather than drifting.
    pub fn seek(&self, to: Duration) {
        let position_us = to.as_micros() as u64;
        self.position_us.store(position_us, Ordering::SeqCst);
        self.start_position_us.store(position_us, Ordering::SeqCst);
        self.start_time_us
            .store(instant_to_us(Instant::now()), Ordering::SeqCst);
    }

    /// Current position: interpolated while running, frozen while paused.
    #[must_use]
    pub fn position(&self) -> Duration {
        if self.running.load(Ordering::SeqCst) {
            if let Some(start) = us_to_instant(self.start_time_us.load(Ordering::SeqCst)) {
                let start_position_us = self.start_position_us.load(Ordering::SeqCst);
                let elapsed_us = start.elapsed().as_micros() as u64;
                return Duration::from_micros(start_position_us + elapsed_us);
            }
        }
        Duration::from_micros(self.position_us.load(Ordering::SeqCst))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
