//! Orchestrator - main simulation loop
//!
//! Implements the tick loop integrating arrivals, queueing, scheduling,
//! service and metrics.
//!
//! See `engine.rs` for full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{
    Simulation, SimulationConfig, SimulationError, SimulationReport, TickResult,
};
