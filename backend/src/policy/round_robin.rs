//! Round Robin Policy
//!
//! Cyclic grants in canonical order N→E→S→W→N. The grant only ends when
//! the time slice expires.
//!
//! # Modes
//!
//! - `SkipEmpty` (default): jump to the next approach that has vehicles
//!   waiting, so green is never handed to an empty approach while another
//!   queue is occupied
//! - `FixedCycle`: strict positional rotation, ignoring occupancy
//!
//! `SkipEmpty` is the default, unlike the classic cyclic scheduler which
//! rotates positionally. Select `FixedCycle` through
//! `SimulationConfig::round_robin_mode` to reproduce that rotation.

use super::{next_occupied, RoundRobinMode, SchedulingPolicy};
use crate::core::signal::{SignalPhase, SwitchReason};
use crate::models::direction::Direction;
use crate::models::state::SimulationState;

/// Round robin over the four approaches
///
/// # Example
///
/// ```
/// use traffic_scheduler_core::policy::{RoundRobinMode, RoundRobinPolicy, SchedulingPolicy};
/// use traffic_scheduler_core::{Direction, SignalPhase, SimulationState};
///
/// let state = SimulationState::new(15);
/// let mut signal = SignalPhase::new(10);
///
/// // Nothing queued anywhere: advance to the next canonical slot
/// let policy = RoundRobinPolicy::new(RoundRobinMode::SkipEmpty);
/// assert_eq!(policy.select_next(&state, &mut signal), Direction::East);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinPolicy {
    mode: RoundRobinMode,
}

impl RoundRobinPolicy {
    pub fn new(mode: RoundRobinMode) -> Self {
        Self { mode }
    }
}

impl SchedulingPolicy for RoundRobinPolicy {
    fn should_switch(&self, _state: &SimulationState, signal: &SignalPhase) -> Option<SwitchReason> {
        signal.is_expired().then_some(SwitchReason::SliceExpired)
    }

    fn select_next(&self, state: &SimulationState, signal: &mut SignalPhase) -> Direction {
        let active = signal.active_direction();
        match self.mode {
            RoundRobinMode::FixedCycle => active.next(),
            RoundRobinMode::SkipEmpty => next_occupied(state, active).unwrap_or_else(|| active.next()),
        }
    }
}
