//! Approach model
//!
//! One compass approach into the intersection: a capacity-bounded FIFO queue
//! of vehicles plus a processed-vehicle counter.
//!
//! # Overflow
//!
//! When an enqueue pushes the queue past capacity the tail is truncated: the
//! front (oldest arrivals) is kept and the newest excess vehicle is
//! discarded. Overflow is an expected outcome, not an error.

use crate::models::direction::Direction;
use crate::models::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default queue capacity per approach
pub const DEFAULT_QUEUE_CAPACITY: usize = 15;

/// A directional FIFO queue with a processed counter
///
/// # Example
/// ```
/// use traffic_scheduler_core::{Approach, Direction, Vehicle, VehicleId, VehicleKind};
///
/// let mut approach = Approach::new(Direction::South, 1);
/// let first = Vehicle::new(VehicleId(1), Direction::South, VehicleKind::Regular, 0, 2);
/// let second = Vehicle::new(VehicleId(2), Direction::South, VehicleKind::Regular, 1, 2);
///
/// assert!(approach.enqueue(first).is_none());
/// let dropped = approach.enqueue(second).unwrap();
/// assert_eq!(dropped.id(), VehicleId(2));
/// assert_eq!(approach.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approach {
    direction: Direction,
    queue: VecDeque<Vehicle>,
    capacity: usize,
    processed: u64,
}

impl Approach {
    /// # Panics
    /// Panics if `capacity` is zero
    pub fn new(direction: Direction, capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        Self {
            direction,
            queue: VecDeque::with_capacity(capacity + 1),
            capacity,
            processed: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Vehicles dequeued for service from this approach
    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queued vehicles, front first
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.queue.iter()
    }

    pub fn front(&self) -> Option<&Vehicle> {
        self.queue.front()
    }

    /// Append to the tail, then bound the queue length.
    ///
    /// Returns the vehicle discarded by the capacity bound, if any.
    pub fn enqueue(&mut self, vehicle: Vehicle) -> Option<Vehicle> {
        self.queue.push_back(vehicle);
        if self.queue.len() > self.capacity {
            self.queue.pop_back()
        } else {
            None
        }
    }

    /// Remove the front vehicle and count it as processed
    pub fn dequeue_for_service(&mut self) -> Option<Vehicle> {
        let vehicle = self.queue.pop_front()?;
        self.processed += 1;
        Some(vehicle)
    }

    /// Refresh `waiting_time` of every queued vehicle against `now`
    pub fn refresh_waiting_times(&mut self, now: u64) {
        for vehicle in self.queue.iter_mut() {
            vehicle.refresh_waiting_time(now);
        }
    }

    pub fn has_emergency(&self) -> bool {
        self.queue.iter().any(Vehicle::is_emergency)
    }

    pub fn emergency_count(&self) -> usize {
        self.queue.iter().filter(|v| v.is_emergency()).count()
    }

    /// Sum of `service_duration` over queued vehicles
    pub fn total_service_demand(&self) -> u64 {
        self.queue
            .iter()
            .map(|v| u64::from(v.service_duration()))
            .sum()
    }

    /// Empty the queue and zero the processed counter
    pub fn clear(&mut self) {
        self.queue.clear();
        self.processed = 0;
    }
}
