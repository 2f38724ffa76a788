//! Event logging for replay and auditing.
//!
//! This module defines the Event enum which captures every significant state
//! change during a run. Events enable:
//! - Debugging (understand what happened and when)
//! - Presentation (animate arrivals, crossings, and light changes)
//! - Analysis (extract per-direction and per-policy patterns)
//!
//! # Event Types
//!
//! Events are categorized by tick phase:
//! - **Arrival** / **Overflow**: vehicle generated, queued or discarded
//! - **ServiceStart** / **Departure**: vehicle enters and clears the intersection
//! - **DirectionSwitch** / **Preemption**: the green light changes hands
//!
//! The log is bounded: once `capacity` events are held, the oldest is evicted.
//!
//! # Example
//!
//! ```rust
//! use traffic_scheduler_core::{Direction, Event, EventLog, VehicleId, VehicleKind};
//!
//! let mut log = EventLog::with_capacity(10);
//! log.log(Event::Arrival {
//!     tick: 3,
//!     vehicle_id: VehicleId(1),
//!     direction: Direction::North,
//!     kind: VehicleKind::Emergency,
//! });
//!
//! assert_eq!(log.events_at_tick(3).len(), 1);
//! ```

use crate::core::signal::SwitchReason;
use crate::models::direction::Direction;
use crate::models::vehicle::{VehicleId, VehicleKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of retained events
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1000;

/// Simulation event capturing a state change.
///
/// All events include a tick number for temporal ordering.
/// Events are logged in the order they occur within a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Vehicle generated and appended to its approach queue
    Arrival {
        tick: u64,
        vehicle_id: VehicleId,
        direction: Direction,
        kind: VehicleKind,
    },

    /// Vehicle discarded by the queue capacity bound
    Overflow {
        tick: u64,
        vehicle_id: VehicleId,
        direction: Direction,
    },

    /// Vehicle dequeued and granted service
    ServiceStart {
        tick: u64,
        vehicle_id: VehicleId,
        direction: Direction,
        waiting_time: u64,
        completion_tick: u64,
    },

    /// Vehicle cleared the intersection
    Departure {
        tick: u64,
        vehicle_id: VehicleId,
        direction: Direction,
    },

    /// Grant moved to a different direction at a transition check
    DirectionSwitch {
        tick: u64,
        from: Direction,
        to: Direction,
        reason: SwitchReason,
    },

    /// Emergency vehicle interrupted the current grant
    Preemption {
        tick: u64,
        from: Direction,
        to: Direction,
    },
}

impl Event {
    /// Get the tick number when this event occurred
    pub fn tick(&self) -> u64 {
        match self {
            Event::Arrival { tick, .. } => *tick,
            Event::Overflow { tick, .. } => *tick,
            Event::ServiceStart { tick, .. } => *tick,
            Event::Departure { tick, .. } => *tick,
            Event::DirectionSwitch { tick, .. } => *tick,
            Event::Preemption { tick, .. } => *tick,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Arrival { .. } => "Arrival",
            Event::Overflow { .. } => "Overflow",
            Event::ServiceStart { .. } => "ServiceStart",
            Event::Departure { .. } => "Departure",
            Event::DirectionSwitch { .. } => "DirectionSwitch",
            Event::Preemption { .. } => "Preemption",
        }
    }

    pub fn vehicle_id(&self) -> Option<VehicleId> {
        match self {
            Event::Arrival { vehicle_id, .. } => Some(*vehicle_id),
            Event::Overflow { vehicle_id, .. } => Some(*vehicle_id),
            Event::ServiceStart { vehicle_id, .. } => Some(*vehicle_id),
            Event::Departure { vehicle_id, .. } => Some(*vehicle_id),
            _ => None,
        }
    }
}

/// Bounded, ordered record of simulation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
    /// Events discarded to respect `capacity`
    evicted: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }

    /// A capacity of zero records nothing (only the eviction count)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            evicted: 0,
        }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Retained events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn events_at_tick(&self, tick: u64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_vehicle(&self, vehicle_id: VehicleId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.vehicle_id() == Some(vehicle_id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.evicted = 0;
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
