//! Shortest Job Next Policy
//!
//! Grants the approach whose queued vehicles need the least total service
//! time. The grant ends only on slice expiry.

use super::SchedulingPolicy;
use crate::core::signal::{SignalPhase, SwitchReason};
use crate::models::direction::Direction;
use crate::models::state::SimulationState;

/// Minimum total service demand among non-empty approaches
///
/// Ties go to the first direction in canonical order. With every queue
/// empty the active direction keeps the grant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestJobNextPolicy;

impl ShortestJobNextPolicy {
    fn shortest_demand(state: &SimulationState) -> Option<Direction> {
        let mut best: Option<(Direction, u64)> = None;

        for approach in state.approaches().iter().filter(|a| !a.is_empty()) {
            let demand = approach.total_service_demand();
            match best {
                Some((_, best_demand)) if demand >= best_demand => {}
                _ => best = Some((approach.direction(), demand)),
            }
        }

        best.map(|(direction, _)| direction)
    }
}

impl SchedulingPolicy for ShortestJobNextPolicy {
    fn should_switch(&self, _state: &SimulationState, signal: &SignalPhase) -> Option<SwitchReason> {
        signal.is_expired().then_some(SwitchReason::SliceExpired)
    }

    fn select_next(&self, state: &SimulationState, signal: &mut SignalPhase) -> Direction {
        Self::shortest_demand(state).unwrap_or(signal.active_direction())
    }
}
