//! # Clock Abstraction
//!
//! Generation blends wall-clock time into candidate bases and falls back to
//! a monotonic nanosecond reading under collision pressure. Both sources sit
//! behind the [`Clock`] trait so tests can substitute deterministic values;
//! production code uses [`SystemClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Time sources consumed by the generator.
///
/// Implementations must be `Send + Sync` so one clock can be shared across
/// concurrent generator callers behind an `Arc`.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn wall_millis(&self) -> u64;

    /// Nanoseconds from an arbitrary per-clock origin. Used only as a
    /// higher-entropy source; callers rely on it changing between reads,
    /// not on any absolute meaning.
    fn monotonic_nanos(&self) -> u64;
}

/// The real clocks: `chrono` wall time and an `Instant` anchor for the
/// monotonic reading.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock anchored at construction time.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn wall_millis(&self) -> u64 {
        // post-epoch on any host this runs on
        chrono::Utc::now().timestamp_millis() as u64
    }

    fn monotonic_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// A hand-driven clock for deterministic tests.
///
/// Both readings are plain atomics; `advance_*` methods move them forward
/// from any thread.
#[derive(Debug, Default)]
pub struct ManualClock {
    wall_millis: AtomicU64,
    monotonic_nanos: AtomicU64,
}

impl ManualClock {
    /// Create a clock with explicit initial readings.
    pub fn new(wall_millis: u64, monotonic_nanos: u64) -> Self {
        Self {
            wall_millis: AtomicU64::new(wall_millis),
            monotonic_nanos: AtomicU64::new(monotonic_nanos),
        }
    }

    /// Move the wall clock forward.
    pub fn advance_millis(&self, millis: u64) {
        self.wall_millis.fetch_add(millis, Ordering::Relaxed);
    }

    /// Move the monotonic reading forward.
    pub fn advance_nanos(&self, nanos: u64) {
        self.monotonic_nanos.fetch_add(nanos, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn wall_millis(&self) -> u64 {
        self.wall_millis.load(Ordering::Relaxed)
    }

    fn monotonic_nanos(&self) -> u64 {
        self.monotonic_nanos.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_wall_is_past_2020() {
        let clock = SystemClock::new();
        assert!(clock.wall_millis() > 1_577_836_800_000); // 2020-01-01
    }

    #[test]
    fn system_clock_monotonic_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.monotonic_nanos();
        let b = clock.monotonic_nanos();
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_is_deterministic() {
        let clock = ManualClock::new(1_000, 42);
        assert_eq!(clock.wall_millis(), 1_000);
        assert_eq!(clock.monotonic_nanos(), 42);
        clock.advance_millis(500);
        clock.advance_nanos(8);
        assert_eq!(clock.wall_millis(), 1_500);
        assert_eq!(clock.monotonic_nanos(), 50);
    }
}
