//! Time management for the simulation
//!
//! The simulation operates in discrete ticks. One tick is one simulated
//! second, so sixty ticks make a simulated minute. This module provides
//! deterministic time advancement.

use serde::{Deserialize, Serialize};

/// Number of ticks in one simulated minute.
pub const TICKS_PER_MINUTE: u64 = 60;

/// Manages simulation time in discrete ticks
///
/// # Example
/// ```
/// use traffic_scheduler_core::TimeManager;
///
/// let mut time = TimeManager::new();
/// assert_eq!(time.current_tick(), 0);
///
/// time.advance_tick();
/// assert_eq!(time.current_tick(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeManager {
    /// Total ticks elapsed since the last reset
    current_tick: u64,
}

impl TimeManager {
    /// Create a clock positioned at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Advance time by one tick
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Get the current tick (total ticks since start)
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Elapsed simulated minutes as a fraction
    ///
    /// # Example
    /// ```
    /// use traffic_scheduler_core::TimeManager;
    ///
    /// let mut time = TimeManager::new();
    /// for _ in 0..90 {
    ///     time.advance_tick();
    /// }
    /// assert_eq!(time.elapsed_minutes(), 1.5);
    /// ```
    pub fn elapsed_minutes(&self) -> f64 {
        self.current_tick as f64 / TICKS_PER_MINUTE as f64
    }

    /// True when the current tick falls on a multiple of `interval`
    ///
    /// Tick 0 never counts as a boundary.
    pub fn is_multiple_of(&self, interval: u64) -> bool {
        interval > 0 && self.current_tick > 0 && self.current_tick % interval == 0
    }

    /// Rewind to tick 0
    pub fn reset(&mut self) {
        self.current_tick = 0;
    }
}
