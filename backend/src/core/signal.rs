//! Grant state machine for the green light.
//!
//! Tracks which approach currently holds the grant, how many ticks of the
//! time slice remain, and how often the grant has changed hands.
//!
//! # Invariants
//!
//! 1. `0 <= time_remaining <= time_slice` at all times
//! 2. `direction_switches` increments only when the active direction changes
//! 3. Every grant (switch or re-grant) resets the countdown to `time_slice`

use crate::models::direction::Direction;
use serde::{Deserialize, Serialize};

/// Why the grant moved to a new direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchReason {
    /// Time slice ran out
    SliceExpired,
    /// Policy-specific early exit (emergency waiting, empty approach)
    EarlyExit,
}

/// Current grant: active direction plus countdown
///
/// # Example
/// ```
/// use traffic_scheduler_core::{Direction, SignalPhase};
///
/// let mut signal = SignalPhase::new(10);
/// assert_eq!(signal.active_direction(), Direction::North);
///
/// signal.tick_down();
/// assert_eq!(signal.time_remaining(), 9);
///
/// assert!(signal.grant(Direction::East));
/// assert_eq!(signal.time_remaining(), 10);
/// assert_eq!(signal.direction_switches(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPhase {
    active_direction: Direction,
    time_remaining: u32,
    time_slice: u32,
    direction_switches: u64,
    /// Last direction chosen by a round-robin scan (Hybrid fallback cursor)
    round_robin_cursor: Direction,
}

impl SignalPhase {
    /// Start of lifecycle: North holds a full slice.
    ///
    /// # Panics
    ///
    /// Panics if `time_slice` is zero
    pub fn new(time_slice: u32) -> Self {
        assert!(time_slice > 0, "time_slice must be positive");
        Self {
            active_direction: Direction::North,
            time_remaining: time_slice,
            time_slice,
            direction_switches: 0,
            round_robin_cursor: Direction::West,
        }
    }

    pub fn active_direction(&self) -> Direction {
        self.active_direction
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn time_slice(&self) -> u32 {
        self.time_slice
    }

    pub fn direction_switches(&self) -> u64 {
        self.direction_switches
    }

    pub fn round_robin_cursor(&self) -> Direction {
        self.round_robin_cursor
    }

    pub fn set_round_robin_cursor(&mut self, direction: Direction) {
        self.round_robin_cursor = direction;
    }

    /// Whether the grant still has ticks left to serve
    pub fn has_time_remaining(&self) -> bool {
        self.time_remaining > 0
    }

    /// Countdown reached zero
    pub fn is_expired(&self) -> bool {
        self.time_remaining == 0
    }

    /// Consume one tick of the current grant (saturating at zero)
    pub fn tick_down(&mut self) {
        self.time_remaining = self.time_remaining.saturating_sub(1);
    }

    /// Hand the grant to `direction` and reset the countdown.
    ///
    /// Returns `true` if the active direction actually changed.
    pub fn grant(&mut self, direction: Direction) -> bool {
        let changed = direction != self.active_direction;
        if changed {
            self.direction_switches += 1;
        }
        self.active_direction = direction;
        self.time_remaining = self.time_slice;
        changed
    }

    /// Back to the lifecycle start, keeping the configured slice
    pub fn reset(&mut self) {
        *self = Self::new(self.time_slice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "time_slice must be positive")]
    fn test_zero_time_slice_panics() {
        SignalPhase::new(0);
    }

    #[test]
    fn test_tick_down_saturates() {
        let mut signal = SignalPhase::new(1);
        signal.tick_down();
        signal.tick_down();
        assert_eq!(signal.time_remaining(), 0);
        assert!(signal.is_expired());
    }

    #[test]
    fn test_regrant_same_direction_does_not_count_switch() {
        let mut signal = SignalPhase::new(10);
        signal.tick_down();
        assert!(!signal.grant(Direction::North));
        assert_eq!(signal.direction_switches(), 0);
        assert_eq!(signal.time_remaining(), 10);
    }

    #[test]
    fn test_reset_restores_lifecycle_start() {
        let mut signal = SignalPhase::new(7);
        signal.grant(Direction::South);
        signal.set_round_robin_cursor(Direction::East);
        signal.reset();

        assert_eq!(signal, SignalPhase::new(7));
        assert_eq!(signal.round_robin_cursor(), Direction::West);
    }
}
