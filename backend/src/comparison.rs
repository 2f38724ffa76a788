//! Side-by-side policy comparison
//!
//! Four independent engines, one per policy, each owning its own state and
//! RNG seeded from the same base seed. They are stepped in lockstep with a
//! shared density. Arrivals consume randomness identically under every
//! policy, so all four engines see the same arrival stream and differ only
//! in how they schedule it.
//!
//! # Example
//!
//! ```rust
//! use traffic_scheduler_core::arrivals::DensityTier;
//! use traffic_scheduler_core::comparison::{ComparisonMetric, PolicyComparison};
//! use traffic_scheduler_core::orchestrator::SimulationConfig;
//!
//! let mut comparison = PolicyComparison::new(SimulationConfig::default()).unwrap();
//! for _ in 0..50 {
//!     comparison.step(DensityTier::Medium);
//! }
//!
//! let best = comparison.best_performer(ComparisonMetric::Throughput);
//! println!("best throughput: {}", best.label());
//! ```

use crate::arrivals::DensityTier;
use crate::metrics::Statistics;
use crate::orchestrator::{Simulation, SimulationConfig, SimulationError, TickResult};
use crate::policy::Policy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistic used to rank policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    Throughput,
    AvgWaitingTime,
    AvgResponseTime,
    AvgTurnaroundTime,
    Utilization,
    EmergencyDelay,
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 6] = [
        ComparisonMetric::Throughput,
        ComparisonMetric::AvgWaitingTime,
        ComparisonMetric::AvgResponseTime,
        ComparisonMetric::AvgTurnaroundTime,
        ComparisonMetric::Utilization,
        ComparisonMetric::EmergencyDelay,
    ];

    /// Throughput and utilization are maximized, delays minimized
    pub fn higher_is_better(self) -> bool {
        matches!(self, ComparisonMetric::Throughput | ComparisonMetric::Utilization)
    }

    pub fn value(self, stats: &Statistics) -> f64 {
        let metrics = &stats.metrics;
        match self {
            ComparisonMetric::Throughput => metrics.throughput,
            ComparisonMetric::AvgWaitingTime => metrics.avg_waiting_time,
            ComparisonMetric::AvgResponseTime => metrics.avg_response_time,
            ComparisonMetric::AvgTurnaroundTime => metrics.avg_turnaround_time,
            ComparisonMetric::Utilization => metrics.utilization,
            ComparisonMetric::EmergencyDelay => metrics.emergency_delay,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComparisonMetric::Throughput => "Throughput",
            ComparisonMetric::AvgWaitingTime => "Avg Waiting Time",
            ComparisonMetric::AvgResponseTime => "Avg Response Time",
            ComparisonMetric::AvgTurnaroundTime => "Avg Turnaround Time",
            ComparisonMetric::Utilization => "Utilization",
            ComparisonMetric::EmergencyDelay => "Emergency Delay",
        }
    }
}

/// Qualitative rating of one metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceRating {
    Excellent,
    Good,
    Poor,
    High,
    Medium,
    Low,
    NotApplicable,
}

impl PerformanceRating {
    /// Rate `value` against fixed thresholds.
    ///
    /// ```
    /// use traffic_scheduler_core::comparison::{ComparisonMetric, PerformanceRating};
    ///
    /// assert_eq!(PerformanceRating::rate(ComparisonMetric::Throughput, 9.0), PerformanceRating::Excellent);
    /// assert_eq!(PerformanceRating::rate(ComparisonMetric::AvgWaitingTime, 20.0), PerformanceRating::Good);
    /// assert_eq!(PerformanceRating::rate(ComparisonMetric::Utilization, 50.0), PerformanceRating::Low);
    /// ```
    pub fn rate(metric: ComparisonMetric, value: f64) -> Self {
        match metric {
            ComparisonMetric::Throughput => {
                if value > 8.0 {
                    PerformanceRating::Excellent
                } else if value > 5.0 {
                    PerformanceRating::Good
                } else {
                    PerformanceRating::Poor
                }
            }
            ComparisonMetric::AvgWaitingTime
            | ComparisonMetric::AvgResponseTime
            | ComparisonMetric::EmergencyDelay => {
                if value < 15.0 {
                    PerformanceRating::Excellent
                } else if value < 25.0 {
                    PerformanceRating::Good
                } else {
                    PerformanceRating::Poor
                }
            }
            ComparisonMetric::Utilization => {
                if value > 80.0 {
                    PerformanceRating::High
                } else if value > 60.0 {
                    PerformanceRating::Medium
                } else {
                    PerformanceRating::Low
                }
            }
            ComparisonMetric::AvgTurnaroundTime => PerformanceRating::NotApplicable,
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PerformanceRating::Excellent => "Excellent",
            PerformanceRating::Good => "Good",
            PerformanceRating::Poor => "Poor",
            PerformanceRating::High => "High",
            PerformanceRating::Medium => "Medium",
            PerformanceRating::Low => "Low",
            PerformanceRating::NotApplicable => "N/A",
        };
        f.write_str(text)
    }
}

/// One engine per policy, stepped together
#[derive(Debug)]
pub struct PolicyComparison {
    engines: Vec<(Policy, Simulation)>,
}

impl PolicyComparison {
    /// Build one engine per policy from the same configuration (and seed)
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let engines = Policy::ALL
            .iter()
            .map(|&policy| Ok((policy, Simulation::new(config.clone())?)))
            .collect::<Result<Vec<_>, SimulationError>>()?;

        Ok(Self { engines })
    }

    /// Advance every engine by one tick with the same density
    pub fn step(&mut self, density: DensityTier) -> Vec<(Policy, TickResult)> {
        self.engines
            .iter_mut()
            .map(|(policy, engine)| (*policy, engine.step(*policy, density)))
            .collect()
    }

    pub fn reset(&mut self) {
        for (_, engine) in self.engines.iter_mut() {
            engine.reset();
        }
    }

    /// Shared clock (all engines advance together)
    pub fn time(&self) -> u64 {
        self.engines.first().map_or(0, |(_, engine)| engine.time())
    }

    pub fn engine(&self, policy: Policy) -> Option<&Simulation> {
        self.engines
            .iter()
            .find(|(p, _)| *p == policy)
            .map(|(_, engine)| engine)
    }

    pub fn engines(&self) -> impl Iterator<Item = (Policy, &Simulation)> {
        self.engines.iter().map(|(policy, engine)| (*policy, engine))
    }

    /// Statistics of every engine in policy order
    pub fn statistics(&self) -> Vec<(Policy, Statistics)> {
        self.engines()
            .map(|(policy, engine)| (policy, engine.statistics()))
            .collect()
    }

    /// Policy with the best value of `metric`; the first in policy order
    /// wins ties.
    pub fn best_performer(&self, metric: ComparisonMetric) -> Policy {
        let mut best: Option<(Policy, f64)> = None;

        for (policy, stats) in self.statistics() {
            let value = metric.value(&stats);
            let better = match best {
                None => true,
                Some((_, best_value)) if metric.higher_is_better() => value > best_value,
                Some((_, best_value)) => value < best_value,
            };
            if better {
                best = Some((policy, value));
            }
        }

        best.map_or(Policy::RoundRobin, |(policy, _)| policy)
    }
}
