//! Traffic Scheduler Core - Rust Engine
//!
//! Discrete-time four-way intersection simulator with deterministic
//! execution. Each compass direction is a bounded FIFO queue of vehicles and
//! a scheduling policy decides, tick by tick, which queue holds the green
//! light.
//!
//! # Architecture
//!
//! - **core**: Simulation clock and the signal grant state machine
//! - **models**: Domain types (Direction, Vehicle, Approach, State, Event)
//! - **arrivals**: Density-driven vehicle generation
//! - **policy**: Scheduling policies (RoundRobin, Priority, SJN, Hybrid)
//! - **metrics**: Waiting/response/turnaround aggregates and rolling history
//! - **orchestrator**: Main simulation loop
//! - **comparison**: Four policies stepped in lockstep
//! - **driver**: Wall-clock tick pacing
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. `0 <= time_remaining <= time_slice` after every step
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Every generated vehicle is queued, crossing, departed or counted as
//!    dropped by the queue bound
//!
//! # Example
//!
//! ```rust
//! use traffic_scheduler_core::{DensityTier, Policy, Simulation, SimulationConfig};
//!
//! let mut simulation = Simulation::new(SimulationConfig::default()).unwrap();
//! for _ in 0..60 {
//!     simulation.step(Policy::PriorityScheduling, DensityTier::High);
//! }
//!
//! let stats = simulation.statistics();
//! assert_eq!(
//!     stats.total_generated,
//!     stats.total_processed + stats.total_waiting + stats.dropped_on_overflow
//! );
//! ```

// Module declarations
pub mod arrivals;
pub mod comparison;
pub mod core;
pub mod driver;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;

// Re-exports for convenience
pub use arrivals::{ArrivalConfig, ArrivalGenerator, DensityTier};
pub use comparison::{ComparisonMetric, PerformanceRating, PolicyComparison};
pub use crate::core::signal::{SignalPhase, SwitchReason};
pub use crate::core::time::TimeManager;
pub use driver::{SpeedMultiplier, TickDriver};
pub use metrics::{MetricsSnapshot, RealtimeHistory, RealtimeSample, Statistics};
pub use models::{
    approach::Approach,
    direction::Direction,
    event::{Event, EventLog},
    state::SimulationState,
    vehicle::{Vehicle, VehicleId, VehicleKind, VehicleStatus},
};
pub use orchestrator::{Simulation, SimulationConfig, SimulationError, SimulationReport, TickResult};
pub use policy::{Policy, RoundRobinMode, SchedulingPolicy};
pub use rng::RngManager;
