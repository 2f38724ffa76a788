//! Wall-clock pacing for an external driver.
//!
//! The engine itself is untimed; a driver steps it once per period, where
//! `period = 1000 ms / speed`. Stopping the driver (dropping it or leaving
//! the loop) is the only cancellation needed, since every tick completes
//! before `step` returns.

use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Base tick period at 1x speed
pub const BASE_TICK_PERIOD: Duration = Duration::from_millis(1000);

pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 3.0;

/// Speed multiplier in `[0.5, 3.0]`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use traffic_scheduler_core::driver::SpeedMultiplier;
///
/// let speed = SpeedMultiplier::new(2.0).unwrap();
/// assert_eq!(speed.period(), Duration::from_millis(500));
/// assert!(SpeedMultiplier::new(4.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SpeedMultiplier(f64);

impl SpeedMultiplier {
    pub fn new(value: f64) -> Result<Self, SimulationError> {
        if (MIN_SPEED..=MAX_SPEED).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SimulationError::SpeedOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Wall-clock time between ticks
    pub fn period(self) -> Duration {
        BASE_TICK_PERIOD.div_f64(self.0)
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Fixed-period ticker.
///
/// Deadlines are scheduled from the previous deadline rather than from
/// the moment `wait` returns, so step time does not accumulate as drift.
#[derive(Debug, Clone)]
pub struct TickDriver {
    speed: SpeedMultiplier,
    next_deadline: Option<Instant>,
    ticks: u64,
}

impl TickDriver {
    pub fn new(speed: SpeedMultiplier) -> Self {
        Self {
            speed,
            next_deadline: None,
            ticks: 0,
        }
    }

    pub fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    pub fn period(&self) -> Duration {
        self.speed.period()
    }

    /// Change speed; takes effect from the next deadline
    pub fn set_speed(&mut self, speed: SpeedMultiplier) {
        self.speed = speed;
    }

    /// Ticks released so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Time left until the next tick is due, measured at `now`.
    /// Zero on the first call.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_deadline
            .map_or(Duration::ZERO, |deadline| deadline.saturating_duration_since(now))
    }

    /// Block until the next tick is due
    pub fn wait(&mut self) {
        let now = Instant::now();
        let remaining = self.remaining(now);
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }

        let base = self.next_deadline.map_or(now, |deadline| deadline.max(now));
        self.next_deadline = Some(base + self.period());
        self.ticks += 1;
    }
}
