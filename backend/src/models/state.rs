//! Simulation State
//!
//! The complete queueing state of the intersection: four directional
//! approaches and the crossing set.
//!
//! # Critical Invariants
//!
//! 1. **Single residence**: a vehicle is in exactly one approach queue or in
//!    the crossing set, never both
//! 2. **Crossing status**: every vehicle in the crossing set is `Crossing`
//! 3. **Processed accounting**: `total_processed = departed + crossing.len()`

use crate::models::approach::Approach;
use crate::models::direction::Direction;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use serde::{Deserialize, Serialize};

/// Per-direction queues plus vehicles currently crossing
///
/// # Example
///
/// ```rust
/// use traffic_scheduler_core::{Direction, SimulationState};
///
/// let state = SimulationState::new(15);
/// assert_eq!(state.total_queued(), 0);
/// assert_eq!(state.approach(Direction::East).capacity(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Indexed by `Direction::index()`
    approaches: [Approach; 4],

    /// Vehicles being served but not yet departed
    crossing: Vec<Vehicle>,

    /// Vehicles that finished crossing
    departed: u64,
}

impl SimulationState {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            approaches: Direction::ALL.map(|d| Approach::new(d, queue_capacity)),
            crossing: Vec::new(),
            departed: 0,
        }
    }

    pub fn approach(&self, direction: Direction) -> &Approach {
        &self.approaches[direction.index()]
    }

    pub fn approach_mut(&mut self, direction: Direction) -> &mut Approach {
        &mut self.approaches[direction.index()]
    }

    /// All approaches in canonical order
    pub fn approaches(&self) -> &[Approach] {
        &self.approaches
    }

    /// Vehicles currently in the intersection
    pub fn crossing(&self) -> &[Vehicle] {
        &self.crossing
    }

    pub fn departed(&self) -> u64 {
        self.departed
    }

    pub fn queue_len(&self, direction: Direction) -> usize {
        self.approach(direction).len()
    }

    pub fn is_queue_empty(&self, direction: Direction) -> bool {
        self.approach(direction).is_empty()
    }

    /// Vehicles waiting across all four queues
    pub fn total_queued(&self) -> usize {
        self.approaches.iter().map(Approach::len).sum()
    }

    /// Vehicles dequeued for service across all approaches
    pub fn total_processed(&self) -> u64 {
        self.approaches.iter().map(Approach::processed).sum()
    }

    /// Emergency vehicles waiting across all queues
    pub fn queued_emergencies(&self) -> usize {
        self.approaches.iter().map(Approach::emergency_count).sum()
    }

    /// First direction in canonical order holding an emergency vehicle
    pub fn first_emergency_direction(&self) -> Option<Direction> {
        self.approaches
            .iter()
            .find(|a| a.has_emergency())
            .map(Approach::direction)
    }

    pub fn has_emergency(&self, direction: Direction) -> bool {
        self.approach(direction).has_emergency()
    }

    pub fn all_queues_empty(&self) -> bool {
        self.approaches.iter().all(Approach::is_empty)
    }

    /// Refresh waiting times in every queue, served or not
    pub fn refresh_waiting_times(&mut self, now: u64) {
        for approach in self.approaches.iter_mut() {
            approach.refresh_waiting_times(now);
        }
    }

    /// Put a just-served vehicle into the crossing set
    pub fn start_crossing(&mut self, vehicle: Vehicle) {
        debug_assert!(
            matches!(vehicle.status(), VehicleStatus::Crossing { .. }),
            "only vehicles in service may enter the crossing set"
        );
        self.crossing.push(vehicle);
    }

    /// Advance every crossing countdown by one tick and remove vehicles
    /// that cleared the intersection. Returns the departed vehicles.
    pub fn advance_crossing(&mut self) -> Vec<Vehicle> {
        let mut departed = Vec::new();
        let mut still_crossing = Vec::with_capacity(self.crossing.len());

        for mut vehicle in self.crossing.drain(..) {
            if vehicle.advance_crossing() {
                departed.push(vehicle);
            } else {
                still_crossing.push(vehicle);
            }
        }

        self.crossing = still_crossing;
        self.departed += departed.len() as u64;
        departed
    }

    /// Empty every collection and zero every counter
    pub fn clear(&mut self) {
        for approach in self.approaches.iter_mut() {
            approach.clear();
        }
        self.crossing.clear();
        self.departed = 0;
    }
}
