//! Vehicle model
//!
//! Represents one arrival at the intersection. Each vehicle has:
//! - A stable id for its whole lifetime
//! - Kind (Regular or Emergency)
//! - Arrival tick and a fixed service duration (ticks needed to cross)
//! - Service timestamps, set exactly once when dequeued
//! - Status (Queued, Crossing, Departed)
//!
//! # Lifecycle
//!
//! ```text
//! Queued ──begin_service──► Crossing { ticks_left } ──advance_crossing──► Departed
//! ```
//!
//! A vehicle lives in exactly one collection at a time: an approach queue
//! while `Queued`, the crossing set while `Crossing`.

use crate::models::direction::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique vehicle identifier, monotonic per engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "veh_{:08}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Regular,
    Emergency,
}

/// Where the vehicle is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Waiting in its approach queue
    Queued,

    /// Granted service, still occupying the intersection
    Crossing {
        /// Ticks until the vehicle clears the intersection
        ticks_left: u32,
    },

    /// Cleared the intersection
    Departed,
}

/// A vehicle waiting at, or crossing, the intersection
///
/// # Example
/// ```
/// use traffic_scheduler_core::{Direction, Vehicle, VehicleId, VehicleKind, VehicleStatus};
///
/// let mut vehicle = Vehicle::new(VehicleId(1), Direction::North, VehicleKind::Regular, 4, 3);
/// vehicle.refresh_waiting_time(9);
/// assert_eq!(vehicle.waiting_time(), 5);
///
/// vehicle.begin_service(9);
/// assert_eq!(vehicle.completion_tick(), Some(12));
/// assert_eq!(vehicle.status(), VehicleStatus::Crossing { ticks_left: 3 });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    direction: Direction,
    kind: VehicleKind,

    /// Tick at which it entered its queue
    arrival_tick: u64,

    /// Ticks needed to cross; immutable once set
    service_duration: u32,

    /// `now - arrival_tick`, refreshed every tick while queued
    waiting_time: u64,

    start_service_tick: Option<u64>,
    completion_tick: Option<u64>,
    status: VehicleStatus,
}

impl Vehicle {
    /// Create a queued vehicle
    ///
    /// # Panics
    /// Panics if `service_duration` is zero
    pub fn new(
        id: VehicleId,
        direction: Direction,
        kind: VehicleKind,
        arrival_tick: u64,
        service_duration: u32,
    ) -> Self {
        assert!(service_duration > 0, "service_duration must be positive");
        Self {
            id,
            direction,
            kind,
            arrival_tick,
            service_duration,
            waiting_time: 0,
            start_service_tick: None,
            completion_tick: None,
            status: VehicleStatus::Queued,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn is_emergency(&self) -> bool {
        self.kind == VehicleKind::Emergency
    }

    pub fn arrival_tick(&self) -> u64 {
        self.arrival_tick
    }

    pub fn service_duration(&self) -> u32 {
        self.service_duration
    }

    pub fn waiting_time(&self) -> u64 {
        self.waiting_time
    }

    pub fn start_service_tick(&self) -> Option<u64> {
        self.start_service_tick
    }

    pub fn completion_tick(&self) -> Option<u64> {
        self.completion_tick
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// Recompute waiting time against the clock.
    ///
    /// Only queued vehicles keep accruing wait; the value freezes once
    /// service starts. Saturates at zero if `now` precedes arrival.
    pub fn refresh_waiting_time(&mut self, now: u64) {
        if self.status == VehicleStatus::Queued {
            self.waiting_time = now.saturating_sub(self.arrival_tick);
        }
    }

    /// Stamp service start and move to `Crossing`.
    ///
    /// Timestamps are set exactly once; calling this on a vehicle that is
    /// no longer queued has no effect.
    pub fn begin_service(&mut self, now: u64) {
        if self.status != VehicleStatus::Queued {
            return;
        }
        let start = now.max(self.arrival_tick);
        self.waiting_time = start - self.arrival_tick;
        self.start_service_tick = Some(start);
        self.completion_tick = Some(start + u64::from(self.service_duration));
        self.status = VehicleStatus::Crossing {
            ticks_left: self.service_duration,
        };
    }

    /// Consume one crossing tick. Returns `true` once the vehicle departs.
    pub fn advance_crossing(&mut self) -> bool {
        match self.status {
            VehicleStatus::Crossing { ticks_left } if ticks_left <= 1 => {
                self.status = VehicleStatus::Departed;
                true
            }
            VehicleStatus::Crossing { ticks_left } => {
                self.status = VehicleStatus::Crossing {
                    ticks_left: ticks_left - 1,
                };
                false
            }
            VehicleStatus::Departed => true,
            VehicleStatus::Queued => false,
        }
    }

    /// `start_service_tick - arrival_tick`, once served
    pub fn response_time(&self) -> Option<u64> {
        self.start_service_tick
            .map(|start| start - self.arrival_tick)
    }

    /// `completion_tick - arrival_tick`, once served
    pub fn turnaround_time(&self) -> Option<u64> {
        self.completion_tick
            .map(|completion| completion - self.arrival_tick)
    }
}
