//! Performance metrics aggregation
//!
//! Every served vehicle contributes one sample to each running aggregate
//! (waiting, response and turnaround time, plus emergency waiting for
//! emergency vehicles). Aggregates are maintained incrementally, so a
//! snapshot is O(1) no matter how long the simulation has run.
//!
//! # Derived values
//!
//! ```text
//! throughput  = processed / now × 60        (vehicles per simulated minute)
//! utilization = (now − idle_ticks) / now × 100
//! efficiency  = processed / generated × 100
//! ```
//!
//! Each ratio is 0 while its denominator is 0.

use crate::core::time::TICKS_PER_MINUTE;
use crate::models::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of retained history samples
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Default ticks between history samples
pub const DEFAULT_HISTORY_INTERVAL: u64 = 5;

// ============================================================================
// Running aggregates
// ============================================================================

/// Count, sum and max of a stream of tick durations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningStat {
    count: u64,
    sum: u64,
    max: u64,
}

impl RunningStat {
    pub fn record(&mut self, value: u64) {
        self.count += 1;
        self.sum += value;
        self.max = self.max.max(value);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// Largest sample; 0 when empty
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Arithmetic mean; 0 when empty
    pub fn mean(&self) -> f64 {
        ratio(self.sum, self.count)
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Accumulates per-service samples and idle ticks
///
/// # Example
///
/// ```
/// use traffic_scheduler_core::metrics::MetricsCollector;
/// use traffic_scheduler_core::{Direction, Vehicle, VehicleId, VehicleKind};
///
/// let mut vehicle = Vehicle::new(VehicleId(0), Direction::East, VehicleKind::Emergency, 2, 3);
/// vehicle.refresh_waiting_time(6);
/// vehicle.begin_service(6);
///
/// let mut collector = MetricsCollector::new();
/// collector.record_service(&vehicle);
/// collector.record_idle();
///
/// let snapshot = collector.snapshot(10, 1);
/// assert_eq!(snapshot.avg_waiting_time, 4.0);
/// assert_eq!(snapshot.emergency_delay, 4.0);
/// assert_eq!(snapshot.avg_turnaround_time, 7.0);
/// assert_eq!(snapshot.utilization, 90.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsCollector {
    waiting: RunningStat,
    emergency_waiting: RunningStat,
    response: RunningStat,
    turnaround: RunningStat,
    idle_ticks: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the samples of a vehicle that was just dequeued for service.
    ///
    /// Must be called after `Vehicle::begin_service`; a vehicle without
    /// service stamps contributes only its waiting time.
    pub fn record_service(&mut self, vehicle: &Vehicle) {
        self.waiting.record(vehicle.waiting_time());
        if vehicle.is_emergency() {
            self.emergency_waiting.record(vehicle.waiting_time());
        }
        if let Some(response) = vehicle.response_time() {
            self.response.record(response);
        }
        if let Some(turnaround) = vehicle.turnaround_time() {
            self.turnaround.record(turnaround);
        }
    }

    /// Tick on which the active approach had nothing to serve
    pub fn record_idle(&mut self) {
        self.idle_ticks += 1;
    }

    pub fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }

    pub fn waiting(&self) -> &RunningStat {
        &self.waiting
    }

    pub fn emergency_waiting(&self) -> &RunningStat {
        &self.emergency_waiting
    }

    pub fn response(&self) -> &RunningStat {
        &self.response
    }

    pub fn turnaround(&self) -> &RunningStat {
        &self.turnaround
    }

    /// Derive the metrics snapshot at tick `now`
    pub fn snapshot(&self, now: u64, total_processed: u64) -> MetricsSnapshot {
        let busy_ticks = now.saturating_sub(self.idle_ticks);
        MetricsSnapshot {
            avg_waiting_time: self.waiting.mean(),
            max_waiting_time: self.waiting.max(),
            emergency_delay: self.emergency_waiting.mean(),
            avg_response_time: self.response.mean(),
            avg_turnaround_time: self.turnaround.mean(),
            throughput: ratio(total_processed * TICKS_PER_MINUTE, now),
            utilization: ratio(busy_ticks * 100, now),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Public snapshots
// ============================================================================

/// Metrics derived from the accumulated samples at one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Mean waiting time at dequeue (ticks)
    pub avg_waiting_time: f64,

    /// Largest waiting time at dequeue (ticks)
    pub max_waiting_time: u64,

    /// Mean waiting time of emergency vehicles (ticks)
    pub emergency_delay: f64,

    pub avg_response_time: f64,

    pub avg_turnaround_time: f64,

    /// Vehicles served per simulated minute
    pub throughput: f64,

    /// Percentage of ticks on which a vehicle was served
    pub utilization: f64,
}

/// Metrics snapshot plus lifetime counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,

    /// Vehicles dequeued for service
    pub total_processed: u64,

    /// Vehicles currently queued in all approaches
    pub total_waiting: u64,

    /// Emergency vehicles currently queued
    pub emergency_count: u64,

    /// Vehicles created by the generator (including injected ones)
    pub total_generated: u64,

    /// `total_processed / total_generated × 100`
    pub efficiency: f64,

    pub direction_switches: u64,

    /// Arrivals discarded because their queue was full
    pub dropped_on_overflow: u64,

    /// Vehicles that finished crossing
    pub departed: u64,

    /// Vehicles currently crossing
    pub crossing: u64,
}

impl Statistics {
    pub fn efficiency(total_processed: u64, total_generated: u64) -> f64 {
        ratio(total_processed * 100, total_generated)
    }
}

// ============================================================================
// Rolling history
// ============================================================================

/// One time-series point for dashboards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealtimeSample {
    pub time: u64,
    pub throughput: f64,
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    pub avg_response_time: f64,
    pub utilization: f64,
    /// Vehicles queued in all approaches
    pub queue_length: u64,
    /// Emergency vehicles queued in all approaches
    pub emergency_count: u64,
}

impl RealtimeSample {
    pub fn from_statistics(time: u64, stats: &Statistics) -> Self {
        Self {
            time,
            throughput: stats.metrics.throughput,
            avg_waiting_time: stats.metrics.avg_waiting_time,
            avg_turnaround_time: stats.metrics.avg_turnaround_time,
            avg_response_time: stats.metrics.avg_response_time,
            utilization: stats.metrics.utilization,
            queue_length: stats.total_waiting,
            emergency_count: stats.emergency_count,
        }
    }
}

/// Bounded rolling history, oldest sample evicted first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeHistory {
    samples: VecDeque<RealtimeSample>,
    capacity: usize,
}

impl RealtimeHistory {
    /// # Panics
    ///
    /// Panics if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: RealtimeSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples oldest first
    pub fn samples(&self) -> impl Iterator<Item = &RealtimeSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&RealtimeSample> {
        self.samples.back()
    }

    pub fn to_vec(&self) -> Vec<RealtimeSample> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for RealtimeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
