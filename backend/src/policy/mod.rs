//! Scheduling Policy Module
//!
//! This module defines the policy interface that decides which approach
//! holds the green light.
//!
//! # Overview
//!
//! The signal is a state machine over the active direction with a countdown
//! of the remaining grant. Every tick the engine asks the active policy two
//! questions:
//!
//! 1. Should the current grant end now? (`should_switch`)
//! 2. If so, which direction gets the next grant? (`select_next`)
//!
//! Hybrid additionally answers a third question before the countdown is
//! decremented: should an emergency take the grant right now? (`preempt`)
//!
//! # Policy Interface
//!
//! All policies implement the `SchedulingPolicy` trait:
//! ```rust
//! use traffic_scheduler_core::policy::SchedulingPolicy;
//! use traffic_scheduler_core::core::signal::SwitchReason;
//! use traffic_scheduler_core::{Direction, SignalPhase, SimulationState};
//!
//! struct AlwaysNorth;
//!
//! impl SchedulingPolicy for AlwaysNorth {
//!     fn should_switch(&self, _state: &SimulationState, signal: &SignalPhase) -> Option<SwitchReason> {
//!         signal.is_expired().then_some(SwitchReason::SliceExpired)
//!     }
//!
//!     fn select_next(&self, _state: &SimulationState, _signal: &mut SignalPhase) -> Direction {
//!         Direction::North
//!     }
//! }
//! ```
//!
//! # Available policies
//!
//! 1. **RoundRobin**: cyclic N→E→S→W, skipping empty approaches by default
//! 2. **PriorityScheduling**: emergencies first, then the longest queue
//! 3. **ShortestJobNext**: smallest total queued service demand
//! 4. **Hybrid**: emergency preemption with a skip-empty round-robin fallback
//!
//! Policies are created through the `Policy` factory:
//!
//! ```rust
//! use traffic_scheduler_core::policy::{Policy, RoundRobinMode};
//!
//! let policy: Policy = "sjn".parse().unwrap();
//! assert_eq!(policy, Policy::ShortestJobNext);
//!
//! let _scheduler = policy.scheduler(RoundRobinMode::SkipEmpty);
//! ```

use crate::core::signal::{SignalPhase, SwitchReason};
use crate::models::direction::Direction;
use crate::models::state::SimulationState;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod hybrid;
pub mod priority;
pub mod round_robin;
pub mod shortest_job;

pub use hybrid::HybridPolicy;
pub use priority::PriorityPolicy;
pub use round_robin::RoundRobinPolicy;
pub use shortest_job::ShortestJobNextPolicy;

/// Strategy deciding when the grant ends and who receives the next one.
///
/// Policies are stateless; anything a policy needs to remember between
/// ticks (the Hybrid round-robin cursor) lives in `SignalPhase`, so one
/// engine can switch policy between ticks without losing state.
pub trait SchedulingPolicy {
    /// Emergency preemption evaluated instead of the countdown decrement.
    ///
    /// Returning `Some(direction)` grants that direction immediately and
    /// skips this tick's decrement. Only Hybrid preempts.
    fn preempt(&self, _state: &SimulationState, _signal: &SignalPhase) -> Option<Direction> {
        None
    }

    /// Transition trigger, evaluated once per tick after the decrement
    fn should_switch(&self, state: &SimulationState, signal: &SignalPhase) -> Option<SwitchReason>;

    /// Choose the direction receiving the next grant.
    ///
    /// Receives the signal mutably so policies that remember a cursor can
    /// advance it.
    fn select_next(&self, state: &SimulationState, signal: &mut SignalPhase) -> Direction;
}

/// Closed set of scheduling policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    RoundRobin,
    PriorityScheduling,
    ShortestJobNext,
    Hybrid,
}

impl Policy {
    /// Every policy, in dashboard order
    pub const ALL: [Policy; 4] = [
        Policy::RoundRobin,
        Policy::PriorityScheduling,
        Policy::ShortestJobNext,
        Policy::Hybrid,
    ];

    /// Build the strategy object for this policy.
    ///
    /// `round_robin_mode` only affects `Policy::RoundRobin`; Hybrid always
    /// falls back to skip-empty.
    pub fn scheduler(self, round_robin_mode: RoundRobinMode) -> Box<dyn SchedulingPolicy> {
        match self {
            Policy::RoundRobin => Box::new(RoundRobinPolicy::new(round_robin_mode)),
            Policy::PriorityScheduling => Box::new(PriorityPolicy),
            Policy::ShortestJobNext => Box::new(ShortestJobNextPolicy),
            Policy::Hybrid => Box::new(HybridPolicy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Policy::RoundRobin => "round_robin",
            Policy::PriorityScheduling => "priority",
            Policy::ShortestJobNext => "sjn",
            Policy::Hybrid => "hybrid",
        }
    }

    /// Human-readable name for reports
    pub fn label(self) -> &'static str {
        match self {
            Policy::RoundRobin => "Round Robin",
            Policy::PriorityScheduling => "Priority Scheduling",
            Policy::ShortestJobNext => "Shortest Job Next",
            Policy::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "roundrobin" | "rr" => Ok(Policy::RoundRobin),
            "priority" | "priorityscheduling" => Ok(Policy::PriorityScheduling),
            "sjn" | "shortestjobnext" | "shortestjob" => Ok(Policy::ShortestJobNext),
            "hybrid" => Ok(Policy::Hybrid),
            _ => Err(SimulationError::UnknownPolicy(s.to_string())),
        }
    }
}

/// How plain round robin treats empty approaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundRobinMode {
    /// Next non-empty approach after the active one; next canonical slot
    /// when every queue is empty
    #[default]
    SkipEmpty,
    /// Strict N→E→S→W regardless of occupancy
    FixedCycle,
}

/// First occupied direction after `from` in cycle order (wrapping, `from`
/// itself checked last).
pub(crate) fn next_occupied(state: &SimulationState, from: Direction) -> Option<Direction> {
    from.cycle_after().find(|&d| !state.is_queue_empty(d))
}
