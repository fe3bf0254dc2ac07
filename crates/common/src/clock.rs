//! Elapsed-time tracking for long-running operations.
//!
//! The render session resets its clock whenever the pipeline (re)enters
//! the playing state, so pauses do not skew the remaining-time estimate.

use std::time::Instant;

/// Nanoseconds per second, the base unit of all timeline positions.
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Tracks wall-clock time elapsed since an operation started.
#[derive(Debug, Clone)]
pub struct ProgressClock {
    started: Instant,
}

impl ProgressClock {
    /// Start a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Re-anchor the clock to now.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Seconds elapsed since the clock was (re)started.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Nanoseconds elapsed since the clock was (re)started.
    pub fn elapsed_ns(&self) -> u64 {
        self.started.elapsed().as_nanos() as u64
    }
}

impl Default for ProgressClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Convert a nanosecond position to fractional seconds.
pub fn ns_to_secs(ns: u64) -> f64 {
    ns as f64 / NANOS_PER_SECOND as f64
}

/// Convert fractional seconds to a nanosecond position.
pub fn secs_to_ns(secs: f64) -> u64 {
    (secs * NANOS_PER_SECOND as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances() {
        let clock = ProgressClock::start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.elapsed_secs() > 0.0);
        assert!(clock.elapsed_ns() > 0);
    }

    #[test]
    fn seconds_conversion_round_trips() {
        assert_eq!(secs_to_ns(1.5), 1_500_000_000);
        assert!((ns_to_secs(2_000_000_000) - 2.0).abs() < 1e-9);
    }
}
