//! Time sources for the session timer.
//!
//! The engine reads two clocks: a monotonic one for counting down and
//! measuring segment length, and a wall clock for the timestamps handed to
//! observers.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync {
    /// Current monotonic instant.
    fn now(&self) -> Instant;

    /// Current wall-clock time.
    fn wall(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct ManualTime {
    base: Instant,
    base_wall: DateTime<Utc>,
    offset: Duration,
}

/// Clock that only moves when told to, for tests and simulations.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<ManualTime>>,
}

impl ManualClock {
    /// Creates a clock whose wall time starts at `wall`.
    pub fn starting_at(wall: DateTime<Utc>) -> Self {
        Self {
            time: Arc::new(Mutex::new(ManualTime {
                base: Instant::now(),
                base_wall: wall,
                offset: Duration::ZERO,
            })),
        }
    }

    /// Moves both clocks forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        time.offset += by;
    }

    /// Moves both clocks forward by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Total time advanced since creation.
    pub fn elapsed(&self) -> Duration {
        self.time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .offset
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        time.base + time.offset
    }

    fn wall(&self) -> DateTime<Utc> {
        let time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        let offset =
            chrono::Duration::from_std(time.offset).unwrap_or_else(|_| chrono::Duration::zero());
        time.base_wall + offset
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_only_moves_when_advanced() {
        let wall = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        let clock = ManualClock::starting_at(wall);

        let start = clock.now();
        assert_eq!(clock.now(), start);
        assert_eq!(clock.wall(), wall);

        clock.advance_secs(90);
        assert_eq!(clock.now() - start, Duration::from_secs(90));
        assert_eq!(clock.wall(), Utc.with_ymd_and_hms(2025, 1, 6, 9, 1, 30).unwrap());
        assert_eq!(clock.elapsed(), Duration::from_secs(90));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance(Duration::from_millis(1500));
        assert_eq!(clock.now() - start, Duration::from_millis(1500));
    }
}
