//! Arrival generation module for deterministic vehicle creation.
//!
//! Every tick, each approach runs one independent Bernoulli trial. The
//! success probability is the density tier's factor, scaled by a per-tick
//! jitter drawn from `jitter` and by a fixed dampening constant:
//!
//! ```text
//! p = tier_factor × uniform(0.8, 1.2) × 0.3
//! ```
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same arrivals
//! 2. **Independence**: One trial per direction per tick, canonical order
//! 3. **Stable draw pattern**: every direction consumes the same number of
//!    draws for the jitter and the trial whether or not a vehicle spawns,
//!    so the stream does not depend on the active policy
//!
//! # Example
//!
//! ```
//! use traffic_scheduler_core::arrivals::{ArrivalConfig, ArrivalGenerator, DensityTier};
//! use traffic_scheduler_core::{Direction, RngManager};
//!
//! let mut rng = RngManager::new(42);
//! let mut generator = ArrivalGenerator::new(ArrivalConfig::default());
//!
//! let vehicle = generator.generate(Direction::North, 3, &mut rng);
//! assert_eq!(vehicle.arrival_tick(), 3);
//! assert!((2..=4).contains(&vehicle.service_duration()));
//! assert_eq!(generator.total_generated(), 1);
//!
//! let arrivals = generator.generate_arrivals(DensityTier::High, 4, &mut rng);
//! assert!(arrivals.len() <= 4);
//! ```

use crate::models::direction::Direction;
use crate::models::vehicle::{Vehicle, VehicleId, VehicleKind};
use crate::orchestrator::SimulationError;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Arrival-rate knob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityTier {
    Low,
    Medium,
    High,
}

impl DensityTier {
    pub const ALL: [DensityTier; 3] = [DensityTier::Low, DensityTier::Medium, DensityTier::High];

    /// Base spawn factor before jitter and dampening
    pub fn factor(self) -> f64 {
        match self {
            DensityTier::Low => 0.25,
            DensityTier::Medium => 0.45,
            DensityTier::High => 0.70,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DensityTier::Low => "low",
            DensityTier::Medium => "medium",
            DensityTier::High => "high",
        }
    }
}

impl fmt::Display for DensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DensityTier {
    type Err = SimulationError;

    /// Unknown tiers are rejected, never defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(DensityTier::Low),
            "medium" => Ok(DensityTier::Medium),
            "high" => Ok(DensityTier::High),
            _ => Err(SimulationError::UnknownDensity(s.to_string())),
        }
    }
}

/// Parameters of the vehicle generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalConfig {
    /// Probability that a generated vehicle is an emergency vehicle
    pub emergency_probability: f64,

    /// Inclusive range of service durations in ticks (min, max)
    pub service_duration: (u32, u32),

    /// Constant multiplier applied to every spawn probability
    pub dampening: f64,

    /// Per-tick jitter range applied to the tier factor (low, high)
    pub jitter: (f64, f64),
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            emergency_probability: 0.08,
            service_duration: (2, 4),
            dampening: 0.3,
            jitter: (0.8, 1.2),
        }
    }
}

impl ArrivalConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(0.0..=1.0).contains(&self.emergency_probability) {
            return Err(SimulationError::InvalidConfig(format!(
                "emergency_probability must be in [0, 1], got {}",
                self.emergency_probability
            )));
        }

        let (min, max) = self.service_duration;
        if min == 0 || min > max {
            return Err(SimulationError::InvalidConfig(format!(
                "service_duration must satisfy 1 <= min <= max, got ({}, {})",
                min, max
            )));
        }

        if !(0.0..=1.0).contains(&self.dampening) {
            return Err(SimulationError::InvalidConfig(format!(
                "dampening must be in [0, 1], got {}",
                self.dampening
            )));
        }

        let (low, high) = self.jitter;
        if !(low >= 0.0 && low <= high) {
            return Err(SimulationError::InvalidConfig(format!(
                "jitter must satisfy 0 <= low <= high, got ({}, {})",
                low, high
            )));
        }

        Ok(())
    }
}

/// Generator for vehicle arrivals across all approaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalGenerator {
    config: ArrivalConfig,

    /// Next vehicle id; doubles as the monotonic generation counter
    next_vehicle_id: u64,
}

impl ArrivalGenerator {
    pub fn new(config: ArrivalConfig) -> Self {
        Self {
            config,
            next_vehicle_id: 0,
        }
    }

    pub fn config(&self) -> &ArrivalConfig {
        &self.config
    }

    /// Vehicles created since construction or the last reset
    pub fn total_generated(&self) -> u64 {
        self.next_vehicle_id
    }

    /// Create one vehicle arriving at `now`.
    ///
    /// Kind is Bernoulli(`emergency_probability`), duration is uniform over
    /// the configured inclusive range.
    pub fn generate(&mut self, direction: Direction, now: u64, rng: &mut RngManager) -> Vehicle {
        let kind = if rng.chance(self.config.emergency_probability) {
            VehicleKind::Emergency
        } else {
            VehicleKind::Regular
        };
        let service_duration = self.sample_service_duration(rng);
        self.build(direction, kind, now, service_duration)
    }

    /// Create a vehicle with caller-chosen kind and duration.
    ///
    /// Consumes no randomness, so injected vehicles never perturb the
    /// arrival stream.
    ///
    /// # Panics
    /// Panics if `service_duration` is zero
    pub fn generate_with(
        &mut self,
        direction: Direction,
        kind: VehicleKind,
        now: u64,
        service_duration: u32,
    ) -> Vehicle {
        self.build(direction, kind, now, service_duration)
    }

    /// Run one spawn trial per direction (canonical order).
    pub fn generate_arrivals(
        &mut self,
        density: DensityTier,
        now: u64,
        rng: &mut RngManager,
    ) -> Vec<Vehicle> {
        let mut arrivals = Vec::new();

        for direction in Direction::ALL {
            let probability = self.spawn_probability(density, rng);
            if rng.chance(probability) {
                arrivals.push(self.generate(direction, now, rng));
            }
        }

        arrivals
    }

    /// Per-tick spawn probability for one direction (draws the jitter)
    fn spawn_probability(&self, density: DensityTier, rng: &mut RngManager) -> f64 {
        let (low, high) = self.config.jitter;
        let jitter = rng.uniform(low, high);
        density.factor() * jitter * self.config.dampening
    }

    fn sample_service_duration(&self, rng: &mut RngManager) -> u32 {
        let (min, max) = self.config.service_duration;
        rng.range(i64::from(min), i64::from(max) + 1) as u32 // +1 for inclusive range
    }

    fn build(&mut self, direction: Direction, kind: VehicleKind, now: u64, duration: u32) -> Vehicle {
        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id += 1;
        Vehicle::new(id, direction, kind, now, duration)
    }

    /// Zero the generation counter
    pub fn reset(&mut self) {
        self.next_vehicle_id = 0;
    }
}
