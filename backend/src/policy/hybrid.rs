//! Hybrid Policy
//!
//! Emergency preemption layered over a skip-empty round robin.
//!
//! # Behavior
//!
//! - Preemption: when the first approach (N, E, S, W) holding an emergency
//!   vehicle is not the active one, the grant moves there immediately, even
//!   if the active queue holds an emergency of its own further back.
//!   The countdown is reset instead of decremented on that tick.
//! - Grant ends on slice expiry or as soon as the active queue is empty
//! - Selection: first approach holding an emergency vehicle; otherwise the
//!   next occupied approach after the remembered round-robin cursor
//!
//! The cursor lives in `SignalPhase`, starts at West (so the first
//! round-robin pick scans from North) and moves only on round-robin picks.

use super::{next_occupied, SchedulingPolicy};
use crate::core::signal::{SignalPhase, SwitchReason};
use crate::models::direction::Direction;
use crate::models::state::SimulationState;

#[derive(Debug, Clone, Copy, Default)]
pub struct HybridPolicy;

impl SchedulingPolicy for HybridPolicy {
    fn preempt(&self, state: &SimulationState, signal: &SignalPhase) -> Option<Direction> {
        state
            .first_emergency_direction()
            .filter(|&direction| direction != signal.active_direction())
    }

    fn should_switch(&self, state: &SimulationState, signal: &SignalPhase) -> Option<SwitchReason> {
        if signal.is_expired() {
            Some(SwitchReason::SliceExpired)
        } else if state.is_queue_empty(signal.active_direction()) {
            Some(SwitchReason::EarlyExit)
        } else {
            None
        }
    }

    fn select_next(&self, state: &SimulationState, signal: &mut SignalPhase) -> Direction {
        if let Some(direction) = state.first_emergency_direction() {
            return direction;
        }

        let cursor = signal.round_robin_cursor();
        let next = next_occupied(state, cursor).unwrap_or_else(|| cursor.next());
        signal.set_round_robin_cursor(next);
        next
    }
}
