//! Simulation Engine
//!
//! Main simulation loop integrating all components:
//! - Crossing expiry (vehicles clearing the intersection)
//! - Vehicle arrivals (deterministic generation)
//! - Service of the active approach
//! - Grant bookkeeping (countdown, preemption, policy transitions)
//! - Metrics aggregation and rolling history
//! - Event logging
//!
//! # Architecture
//!
//! `Simulation::step` runs one tick in a fixed order:
//!
//! ```text
//! For each tick t:
//! 1. Advance clock (now += 1)
//! 2. Advance crossing vehicles, remove those whose service elapsed
//! 3. Arrivals: one Bernoulli trial per direction, bounded enqueue
//! 4. Refresh waiting time of every queued vehicle
//! 5. Serve the front of the active queue, or count an idle tick
//! 6. Hybrid preemption, otherwise decrement the countdown
//! 7. Evaluate the policy trigger; on trigger select and grant
//! 8. Recompute metrics, sample history every `history_interval` ticks
//! ```
//!
//! # Example
//!
//! ```rust
//! use traffic_scheduler_core::arrivals::DensityTier;
//! use traffic_scheduler_core::orchestrator::{Simulation, SimulationConfig};
//! use traffic_scheduler_core::policy::Policy;
//!
//! let mut simulation = Simulation::new(SimulationConfig::default()).unwrap();
//!
//! for _ in 0..10 {
//!     let result = simulation.step(Policy::Hybrid, DensityTier::Medium);
//!     println!("Tick {}: {} arrivals, green {}",
//!              result.tick, result.arrivals, result.active_direction);
//! }
//!
//! assert_eq!(simulation.time(), 10);
//! ```

use crate::arrivals::{ArrivalConfig, ArrivalGenerator, DensityTier};
use crate::core::signal::SignalPhase;
use crate::core::time::TimeManager;
use crate::metrics::{
    MetricsCollector, MetricsSnapshot, RealtimeHistory, RealtimeSample, Statistics,
    DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_INTERVAL,
};
use crate::models::approach::DEFAULT_QUEUE_CAPACITY;
use crate::models::direction::Direction;
use crate::models::event::{Event, EventLog, DEFAULT_EVENT_LOG_CAPACITY};
use crate::models::state::SimulationState;
use crate::models::vehicle::{Vehicle, VehicleId, VehicleKind};
use crate::policy::{Policy, RoundRobinMode, SchedulingPolicy};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, trace};
use uuid::Uuid;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete engine configuration
///
/// Policy and density are not part of the configuration: they are passed
/// to every `step` call so a driver can change them between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    /// Maximum grant duration in ticks
    pub time_slice: u32,

    /// Maximum vehicles per approach queue
    pub queue_capacity: usize,

    /// Probability that a generated vehicle is an emergency vehicle
    pub emergency_probability: f64,

    /// Inclusive service duration range in ticks (min, max)
    pub service_duration: (u32, u32),

    /// Constant multiplier on every spawn probability
    pub arrival_dampening: f64,

    /// Per-tick jitter range on the density factor (low, high)
    pub arrival_jitter: (f64, f64),

    /// Ticks between rolling history samples
    pub history_interval: u64,

    /// Rolling history samples retained
    pub history_capacity: usize,

    /// Events retained in the log (0 keeps none)
    pub event_log_capacity: usize,

    /// Empty-queue handling of plain round robin
    pub round_robin_mode: RoundRobinMode,

    /// When false, `step` generates no arrivals and vehicles only enter
    /// through `inject_vehicle`
    pub arrivals_enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let arrivals = ArrivalConfig::default();
        Self {
            rng_seed: 12345,
            time_slice: 10,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            emergency_probability: arrivals.emergency_probability,
            service_duration: arrivals.service_duration,
            arrival_dampening: arrivals.dampening,
            arrival_jitter: arrivals.jitter,
            history_interval: DEFAULT_HISTORY_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
            round_robin_mode: RoundRobinMode::default(),
            arrivals_enabled: true,
        }
    }
}

impl SimulationConfig {
    /// Generator parameters carried by this configuration
    pub fn arrival_config(&self) -> ArrivalConfig {
        ArrivalConfig {
            emergency_probability: self.emergency_probability,
            service_duration: self.service_duration,
            dampening: self.arrival_dampening,
            jitter: self.arrival_jitter,
        }
    }

    /// Check every field; the first violation is reported.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.time_slice == 0 {
            return Err(SimulationError::InvalidConfig(
                "time_slice must be positive".to_string(),
            ));
        }

        if self.queue_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "queue_capacity must be positive".to_string(),
            ));
        }

        if self.history_interval == 0 {
            return Err(SimulationError::InvalidConfig(
                "history_interval must be positive".to_string(),
            ));
        }

        if self.history_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "history_capacity must be positive".to_string(),
            ));
        }

        self.arrival_config().validate()
    }
}

// ============================================================================
// Results and Errors
// ============================================================================

/// What happened during one `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    /// Tick that was executed
    pub tick: u64,

    /// Vehicles generated this tick (queued or dropped)
    pub arrivals: usize,

    /// Arrivals discarded by the capacity bound
    pub dropped: usize,

    /// Vehicle dequeued for service, if any
    pub served: Option<VehicleId>,

    /// Vehicles that cleared the intersection
    pub departures: usize,

    /// Emergency preemption target, if the grant was preempted
    pub preempted_to: Option<Direction>,

    /// `(from, to)` when a transition check moved the grant
    pub switched: Option<(Direction, Direction)>,

    /// Direction holding the grant after the tick
    pub active_direction: Direction,

    pub time_remaining: u32,
}

/// Serializable snapshot of an engine for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub simulation_id: Uuid,
    pub time: u64,
    /// Policy used on the most recent step
    pub policy: Policy,
    pub metrics: MetricsSnapshot,
    pub processed: BTreeMap<Direction, u64>,
    pub statistics: Statistics,
}

impl SimulationReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Simulation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("Unknown density tier: {0}")]
    UnknownDensity(String),

    #[error("Unknown direction: {0}")]
    UnknownDirection(String),

    /// Tick speed multiplier outside [0.5, 3.0]
    #[error("Speed multiplier out of range [0.5, 3.0]: {0}")]
    SpeedOutOfRange(f64),

    #[error("Service duration must be positive, got {0}")]
    InvalidServiceDuration(u32),
}

// ============================================================================
// Simulation
// ============================================================================

/// Intersection engine owning all simulation state
///
/// The Simulation owns and coordinates:
/// - Four approach queues and the crossing set
/// - The signal grant (active direction and countdown)
/// - Vehicle arrivals
/// - Metrics and rolling history
/// - Event logging
///
/// # Determinism
///
/// All randomness is via `rng` with seeded xorshift64*.
/// Same seed + same config + same step inputs = identical results.
pub struct Simulation {
    /// Engine configuration (validated)
    config: SimulationConfig,

    /// Instance identity, kept across `reset`
    simulation_id: Uuid,

    time: TimeManager,

    rng: RngManager,

    /// Queues, crossing set and departed counter
    state: SimulationState,

    /// Green-light grant
    signal: SignalPhase,

    arrivals: ArrivalGenerator,

    /// Policy of the most recent step and its strategy object
    policy: Policy,
    scheduler: Box<dyn SchedulingPolicy>,

    metrics: MetricsCollector,

    /// Metrics recomputed at the end of every step
    snapshot: MetricsSnapshot,

    history: RealtimeHistory,

    events: EventLog,

    /// Arrivals discarded because their queue was full
    dropped_on_overflow: u64,
}

impl Simulation {
    /// Create a new engine at the lifecycle start
    ///
    /// # Returns
    ///
    /// * `Ok(Simulation)` - Successfully initialized engine
    /// * `Err(SimulationError)` - Configuration validation failed
    ///
    /// # Example
    ///
    /// ```rust
    /// use traffic_scheduler_core::orchestrator::{Simulation, SimulationConfig};
    /// use traffic_scheduler_core::Direction;
    ///
    /// let simulation = Simulation::new(SimulationConfig::default()).unwrap();
    /// assert_eq!(simulation.time(), 0);
    /// assert_eq!(simulation.active_direction(), Direction::North);
    /// assert_eq!(simulation.time_remaining(), 10);
    ///
    /// let invalid = SimulationConfig { time_slice: 0, ..SimulationConfig::default() };
    /// assert!(Simulation::new(invalid).is_err());
    /// ```
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let policy = Policy::RoundRobin;
        let simulation = Self {
            simulation_id: Uuid::new_v4(),
            time: TimeManager::new(),
            rng: RngManager::new(config.rng_seed),
            state: SimulationState::new(config.queue_capacity),
            signal: SignalPhase::new(config.time_slice),
            arrivals: ArrivalGenerator::new(config.arrival_config()),
            policy,
            scheduler: policy.scheduler(config.round_robin_mode),
            metrics: MetricsCollector::new(),
            snapshot: MetricsSnapshot::default(),
            history: RealtimeHistory::new(config.history_capacity),
            events: EventLog::with_capacity(config.event_log_capacity),
            dropped_on_overflow: 0,
            config,
        };

        info!(
            simulation_id = %simulation.simulation_id,
            seed = simulation.config.rng_seed,
            time_slice = simulation.config.time_slice,
            "simulation created"
        );

        Ok(simulation)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn simulation_id(&self) -> Uuid {
        self.simulation_id
    }

    /// Current tick
    pub fn time(&self) -> u64 {
        self.time.current_tick()
    }

    pub fn active_direction(&self) -> Direction {
        self.signal.active_direction()
    }

    pub fn time_remaining(&self) -> u32 {
        self.signal.time_remaining()
    }

    pub fn time_slice(&self) -> u32 {
        self.signal.time_slice()
    }

    /// Policy used on the most recent step (RoundRobin before any step)
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Queues, crossing set and departed count
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn signal(&self) -> &SignalPhase {
        &self.signal
    }

    /// Queued vehicles of one approach, front first
    pub fn queue(&self, direction: Direction) -> Vec<&Vehicle> {
        self.state.approach(direction).vehicles().collect()
    }

    pub fn processed(&self, direction: Direction) -> u64 {
        self.state.approach(direction).processed()
    }

    /// Vehicles currently crossing the intersection
    pub fn crossing(&self) -> &[Vehicle] {
        self.state.crossing()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.events
    }

    /// Metrics snapshot as of the last step
    pub fn metrics(&self) -> MetricsSnapshot {
        self.snapshot
    }

    /// Metrics snapshot plus lifetime counters
    pub fn statistics(&self) -> Statistics {
        let total_processed = self.state.total_processed();
        let total_generated = self.arrivals.total_generated();
        Statistics {
            metrics: self.snapshot,
            total_processed,
            total_waiting: self.state.total_queued() as u64,
            emergency_count: self.state.queued_emergencies() as u64,
            total_generated,
            efficiency: Statistics::efficiency(total_processed, total_generated),
            direction_switches: self.signal.direction_switches(),
            dropped_on_overflow: self.dropped_on_overflow,
            departed: self.state.departed(),
            crossing: self.state.crossing().len() as u64,
        }
    }

    /// Bounded rolling history, oldest first
    pub fn realtime_metrics(&self) -> &RealtimeHistory {
        &self.history
    }

    /// Serializable bundle of the engine's public state
    pub fn export_report(&self) -> SimulationReport {
        SimulationReport {
            simulation_id: self.simulation_id,
            time: self.time(),
            policy: self.policy,
            metrics: self.snapshot,
            processed: Direction::ALL
                .iter()
                .map(|&direction| (direction, self.processed(direction)))
                .collect(),
            statistics: self.statistics(),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Back to the lifecycle start: clock 0, North active with a full
    /// slice, empty queues, zeroed counters, RNG reseeded.
    pub fn reset(&mut self) {
        self.time.reset();
        self.rng = RngManager::new(self.config.rng_seed);
        self.state.clear();
        self.signal.reset();
        self.arrivals.reset();
        self.metrics.reset();
        self.snapshot = MetricsSnapshot::default();
        self.history.clear();
        self.events.clear();
        self.dropped_on_overflow = 0;

        info!(simulation_id = %self.simulation_id, "simulation reset");
    }

    /// Enqueue a vehicle with caller-chosen kind and duration at the
    /// current tick.
    ///
    /// The vehicle counts toward `total_generated` and obeys the queue
    /// bound. Consumes no randomness.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(id))` - Vehicle queued
    /// * `Ok(None)` - Vehicle dropped by the capacity bound
    /// * `Err(InvalidServiceDuration)` - `service_duration` is zero
    ///
    /// # Example
    ///
    /// ```rust
    /// use traffic_scheduler_core::orchestrator::{Simulation, SimulationConfig};
    /// use traffic_scheduler_core::{Direction, VehicleKind};
    ///
    /// let mut simulation = Simulation::new(SimulationConfig::default()).unwrap();
    /// let id = simulation.inject_vehicle(Direction::West, VehicleKind::Emergency, 3).unwrap();
    ///
    /// assert!(id.is_some());
    /// assert_eq!(simulation.state().queue_len(Direction::West), 1);
    /// assert!(simulation.inject_vehicle(Direction::West, VehicleKind::Regular, 0).is_err());
    /// ```
    pub fn inject_vehicle(
        &mut self,
        direction: Direction,
        kind: VehicleKind,
        service_duration: u32,
    ) -> Result<Option<VehicleId>, SimulationError> {
        if service_duration == 0 {
            return Err(SimulationError::InvalidServiceDuration(service_duration));
        }

        let now = self.time();
        let vehicle = self.arrivals.generate_with(direction, kind, now, service_duration);
        let id = vehicle.id();
        let queued = self.admit(vehicle, now);
        Ok(queued.then_some(id))
    }

    // ========================================================================
    // Tick Loop
    // ========================================================================

    /// Execute one tick with the given policy and arrival density
    ///
    /// Total: never fails and never panics under a validated configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use traffic_scheduler_core::arrivals::DensityTier;
    /// use traffic_scheduler_core::orchestrator::{Simulation, SimulationConfig};
    /// use traffic_scheduler_core::policy::Policy;
    ///
    /// let mut simulation = Simulation::new(SimulationConfig::default()).unwrap();
    /// let result = simulation.step(Policy::RoundRobin, DensityTier::High);
    ///
    /// assert_eq!(result.tick, 1);
    /// assert_eq!(simulation.time_remaining(), 9);
    /// ```
    pub fn step(&mut self, policy: Policy, density: DensityTier) -> TickResult {
        self.time.advance_tick();
        let now = self.time.current_tick();

        let departures = self.advance_crossing(now);
        let (arrivals, dropped) = self.generate_arrivals(density, now);
        self.state.refresh_waiting_times(now);
        let served = self.serve_active(now);
        let (preempted_to, switched) = self.update_grant(policy, now);
        self.refresh_metrics(now);

        TickResult {
            tick: now,
            arrivals,
            dropped,
            served,
            departures,
            preempted_to,
            switched,
            active_direction: self.signal.active_direction(),
            time_remaining: self.signal.time_remaining(),
        }
    }

    fn advance_crossing(&mut self, now: u64) -> usize {
        let departed = self.state.advance_crossing();
        for vehicle in &departed {
            self.events.log(Event::Departure {
                tick: now,
                vehicle_id: vehicle.id(),
                direction: vehicle.direction(),
            });
        }
        departed.len()
    }

    /// Returns `(generated, dropped)`
    fn generate_arrivals(&mut self, density: DensityTier, now: u64) -> (usize, usize) {
        if !self.config.arrivals_enabled {
            return (0, 0);
        }

        let vehicles = self.arrivals.generate_arrivals(density, now, &mut self.rng);
        let generated = vehicles.len();
        let mut dropped = 0;
        for vehicle in vehicles {
            if !self.admit(vehicle, now) {
                dropped += 1;
            }
        }
        (generated, dropped)
    }

    /// Append to the vehicle's approach. Returns `false` if the capacity
    /// bound discarded it.
    fn admit(&mut self, vehicle: Vehicle, now: u64) -> bool {
        let id = vehicle.id();
        let direction = vehicle.direction();

        trace!(tick = now, vehicle = %id, %direction, kind = ?vehicle.kind(), "arrival");
        self.events.log(Event::Arrival {
            tick: now,
            vehicle_id: id,
            direction,
            kind: vehicle.kind(),
        });

        match self.state.approach_mut(direction).enqueue(vehicle) {
            None => true,
            Some(discarded) => {
                self.dropped_on_overflow += 1;
                debug!(tick = now, vehicle = %discarded.id(), %direction, "queue full, arrival dropped");
                self.events.log(Event::Overflow {
                    tick: now,
                    vehicle_id: discarded.id(),
                    direction,
                });
                discarded.id() != id
            }
        }
    }

    /// Dequeue the front of the active queue into the crossing set, or
    /// count an idle tick.
    fn serve_active(&mut self, now: u64) -> Option<VehicleId> {
        let active = self.signal.active_direction();
        let next = if self.signal.has_time_remaining() {
            self.state.approach_mut(active).dequeue_for_service()
        } else {
            None
        };

        let Some(mut vehicle) = next else {
            self.metrics.record_idle();
            return None;
        };

        vehicle.begin_service(now);
        self.metrics.record_service(&vehicle);

        let id = vehicle.id();
        let completion_tick = vehicle.completion_tick().unwrap_or(now);
        trace!(tick = now, vehicle = %id, direction = %active, waiting = vehicle.waiting_time(), "service start");
        self.events.log(Event::ServiceStart {
            tick: now,
            vehicle_id: id,
            direction: active,
            waiting_time: vehicle.waiting_time(),
            completion_tick,
        });

        self.state.start_crossing(vehicle);
        Some(id)
    }

    /// Countdown, preemption and transition check.
    ///
    /// Returns `(preempted_to, switched)`.
    fn update_grant(
        &mut self,
        policy: Policy,
        now: u64,
    ) -> (Option<Direction>, Option<(Direction, Direction)>) {
        if policy != self.policy {
            self.policy = policy;
            self.scheduler = policy.scheduler(self.config.round_robin_mode);
        }

        let scheduler = self.scheduler.as_ref();

        let from = self.signal.active_direction();
        let preempted_to = scheduler.preempt(&self.state, &self.signal);
        match preempted_to {
            Some(to) => {
                self.signal.grant(to);
                debug!(tick = now, %from, %to, "emergency preemption");
                self.events.log(Event::Preemption { tick: now, from, to });
            }
            None => self.signal.tick_down(),
        }

        let mut switched = None;
        if let Some(reason) = scheduler.should_switch(&self.state, &self.signal) {
            let from = self.signal.active_direction();
            let to = scheduler.select_next(&self.state, &mut self.signal);
            if self.signal.grant(to) {
                debug!(tick = now, %from, %to, ?reason, "direction switch");
                self.events.log(Event::DirectionSwitch {
                    tick: now,
                    from,
                    to,
                    reason,
                });
                switched = Some((from, to));
            }
        }

        (preempted_to, switched)
    }

    fn refresh_metrics(&mut self, now: u64) {
        self.snapshot = self.metrics.snapshot(now, self.state.total_processed());

        if self.time.is_multiple_of(self.config.history_interval) {
            let sample = RealtimeSample::from_statistics(now, &self.statistics());
            self.history.push(sample);
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("simulation_id", &self.simulation_id)
            .field("time", &self.time.current_tick())
            .field("policy", &self.policy)
            .field("active_direction", &self.signal.active_direction())
            .field("time_remaining", &self.signal.time_remaining())
            .field("queued", &self.state.total_queued())
            .field("crossing", &self.state.crossing().len())
            .finish()
    }
}
