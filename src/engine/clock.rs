//! Time source abstraction for the drawing loop.
//!
//! All engine pacing (inter-task delay, settle pause, minimal yield) goes
//! through [`Clock`], so tests and benchmarks run on virtual time instead of
//! wall-clock waits.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Suspend the (single) worker for `duration`.
    fn sleep(&mut self, duration: Duration);

    /// Current time as epoch milliseconds, used for checkpoint timestamps.
    fn now_millis(&self) -> u64;
}

/// Wall-clock implementation backed by `std::thread::sleep`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Virtual clock that returns immediately from every sleep.
///
/// Requested sleeps advance the virtual time and are recorded, so tests can
/// assert on pacing without waiting for it.
#[derive(Debug)]
pub struct InstantClock {
    now: u64,
    slept: Vec<Duration>,
}

impl InstantClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: start_millis,
            slept: Vec::new(),
        }
    }

    /// Every sleep requested so far, in order.
    pub fn slept(&self) -> &[Duration] {
        &self.slept
    }

    /// Total virtual time spent sleeping.
    pub fn total_slept(&self) -> Duration {
        self.slept.iter().sum()
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for InstantClock {
    fn sleep(&mut self, duration: Duration) {
        self.now += duration.as_millis() as u64;
        self.slept.push(duration);
    }

    fn now_millis(&self) -> u64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_clock_advances_virtually() {
        let mut clock = InstantClock::new(1_000);
        clock.sleep(Duration::from_millis(300));
        clock.sleep(Duration::from_millis(200));

        assert_eq!(clock.now_millis(), 1_500);
        assert_eq!(clock.slept().len(), 2);
        assert_eq!(clock.total_slept(), Duration::from_millis(500));
    }

    #[test]
    fn test_system_clock_now_is_nonzero() {
        let clock = SystemClock;
        assert!(clock.now_millis() > 0);
    }
}
