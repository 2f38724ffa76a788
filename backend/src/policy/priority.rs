//! Priority Scheduling Policy
//!
//! Emergency vehicles first, otherwise the longest queue.
//!
//! # Behavior
//!
//! - Grant ends on slice expiry, or early when the first approach holding
//!   an emergency vehicle is not the active one
//! - Selection: first approach (N, E, S, W) holding an emergency vehicle;
//!   otherwise the strictly longest queue, first in canonical order on ties
//! - The early exit is evaluated at the tick boundary, never mid-tick

use super::SchedulingPolicy;
use crate::core::signal::{SignalPhase, SwitchReason};
use crate::models::direction::Direction;
use crate::models::state::SimulationState;

/// Emergency-first, then longest-queue policy
///
/// # Example
///
/// ```
/// use traffic_scheduler_core::policy::{PriorityPolicy, SchedulingPolicy};
/// use traffic_scheduler_core::{Direction, SignalPhase, SimulationState, Vehicle, VehicleId, VehicleKind};
///
/// let mut state = SimulationState::new(15);
/// for i in 0..3 {
///     state.approach_mut(Direction::South)
///         .enqueue(Vehicle::new(VehicleId(i), Direction::South, VehicleKind::Regular, 0, 2));
/// }
/// state.approach_mut(Direction::West)
///     .enqueue(Vehicle::new(VehicleId(9), Direction::West, VehicleKind::Emergency, 0, 2));
///
/// let mut signal = SignalPhase::new(10);
/// assert_eq!(PriorityPolicy.select_next(&state, &mut signal), Direction::West);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityPolicy;

impl PriorityPolicy {
    /// Strictly longest queue; first in canonical order wins ties, so an
    /// all-empty intersection yields North.
    fn longest_queue(state: &SimulationState) -> Direction {
        let mut best = Direction::North;
        let mut best_len = state.queue_len(best);

        for direction in Direction::ALL {
            let len = state.queue_len(direction);
            if len > best_len {
                best = direction;
                best_len = len;
            }
        }

        best
    }
}

impl SchedulingPolicy for PriorityPolicy {
    fn should_switch(&self, state: &SimulationState, signal: &SignalPhase) -> Option<SwitchReason> {
        if signal.is_expired() {
            return Some(SwitchReason::SliceExpired);
        }

        state
            .first_emergency_direction()
            .filter(|&direction| direction != signal.active_direction())
            .map(|_| SwitchReason::EarlyExit)
    }

    fn select_next(&self, state: &SimulationState, _signal: &mut SignalPhase) -> Direction {
        state
            .first_emergency_direction()
            .unwrap_or_else(|| Self::longest_queue(state))
    }
}
