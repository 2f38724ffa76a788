//! Domain models for the intersection

pub mod approach;
pub mod direction;
pub mod event;
pub mod state;
pub mod vehicle;

// Re-exports
pub use approach::Approach;
pub use direction::Direction;
pub use event::{Event, EventLog};
pub use state::SimulationState;
pub use vehicle::{Vehicle, VehicleId, VehicleKind, VehicleStatus};
