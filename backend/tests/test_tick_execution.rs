//! Tick Execution Tests
//!
//! Order of effects inside `step`, crossing lifecycle, idle accounting,
//! history sampling, reset, and configuration errors.

use traffic_scheduler_core::{
    DensityTier, Direction, Event, Policy, Simulation, SimulationConfig, SimulationError,
    VehicleKind, VehicleStatus,
};

fn quiet() -> Simulation {
    Simulation::new(SimulationConfig {
        arrivals_enabled: false,
        ..SimulationConfig::default()
    })
    .unwrap()
}

/// Rank of an event within a tick
fn phase(event: &Event) -> u8 {
    match event {
        Event::Departure { .. } => 0,
        Event::Arrival { .. } | Event::Overflow { .. } => 1,
        Event::ServiceStart { .. } => 2,
        Event::Preemption { .. } => 3,
        Event::DirectionSwitch { .. } => 4,
    }
}

#[test]
fn test_clock_advances_one_tick_per_step() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    for expected in 1..=25 {
        let result = sim.step(Policy::RoundRobin, DensityTier::Medium);
        assert_eq!(result.tick, expected);
        assert_eq!(sim.time(), expected);
    }
}

#[test]
fn test_events_follow_step_phase_order() {
    let mut sim = Simulation::new(SimulationConfig {
        rng_seed: 99,
        ..SimulationConfig::default()
    })
    .unwrap();

    for _ in 0..150 {
        sim.step(Policy::Hybrid, DensityTier::High);
    }

    let events: Vec<&Event> = sim.event_log().events().collect();
    assert!(!events.is_empty());
    for pair in events.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.tick() <= b.tick());
        if a.tick() == b.tick() {
            assert!(phase(a) <= phase(b), "{:?} logged before {:?}", a, b);
        }
    }
}

#[test]
fn test_vehicle_departs_after_service_duration() {
    let mut sim = quiet();
    let id = sim
        .inject_vehicle(Direction::North, VehicleKind::Regular, 4)
        .unwrap()
        .unwrap();

    sim.step(Policy::RoundRobin, DensityTier::Low); // served at tick 1
    assert!(matches!(
        sim.crossing()[0].status(),
        VehicleStatus::Crossing { ticks_left: 4 }
    ));

    for _ in 0..3 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
        assert_eq!(sim.crossing().len(), 1);
    }

    let result = sim.step(Policy::RoundRobin, DensityTier::Low);
    assert_eq!(result.departures, 1);
    assert!(sim.crossing().is_empty());

    let departures = sim.event_log().events_of_type("Departure");
    assert_eq!(departures.len(), 1);
    assert_eq!(departures[0].tick(), 5);
    assert_eq!(departures[0].vehicle_id(), Some(id));
}

#[test]
fn test_service_stamps_and_samples() {
    let mut sim = quiet();
    sim.inject_vehicle(Direction::East, VehicleKind::Emergency, 3).unwrap();

    // East gets the grant at tick 10, serves at tick 11
    for _ in 0..11 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
    }

    let vehicle = &sim.crossing()[0];
    assert_eq!(vehicle.arrival_tick(), 0);
    assert_eq!(vehicle.start_service_tick(), Some(11));
    assert_eq!(vehicle.completion_tick(), Some(14));

    let metrics = sim.metrics();
    assert_eq!(metrics.avg_waiting_time, 11.0);
    assert_eq!(metrics.max_waiting_time, 11);
    assert_eq!(metrics.emergency_delay, 11.0);
    assert_eq!(metrics.avg_response_time, 11.0);
    assert_eq!(metrics.avg_turnaround_time, 14.0);
}

#[test]
fn test_idle_ticks_lower_utilization() {
    let mut sim = quiet();
    for _ in 0..5 {
        sim.inject_vehicle(Direction::North, VehicleKind::Regular, 2).unwrap();
    }

    for _ in 0..10 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
    }

    let metrics = sim.metrics();
    assert_eq!(metrics.utilization, 50.0);
    assert_eq!(metrics.throughput, 30.0); // 5 vehicles in 10 ticks
}

#[test]
fn test_tick_results_account_for_every_arrival() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let mut arrivals = 0;
    let mut dropped = 0;
    let mut served = 0;

    for _ in 0..400 {
        let result = sim.step(Policy::ShortestJobNext, DensityTier::High);
        arrivals += result.arrivals as u64;
        dropped += result.dropped as u64;
        served += u64::from(result.served.is_some());
    }

    let stats = sim.statistics();
    assert_eq!(stats.total_generated, arrivals);
    assert_eq!(stats.dropped_on_overflow, dropped);
    assert_eq!(stats.total_processed, served);
}

#[test]
fn test_injected_vehicles_count_as_generated() {
    let mut sim = quiet();
    sim.inject_vehicle(Direction::South, VehicleKind::Regular, 2).unwrap();
    sim.inject_vehicle(Direction::West, VehicleKind::Emergency, 2).unwrap();

    let stats = sim.statistics();
    assert_eq!(stats.total_generated, 2);
    assert_eq!(stats.total_waiting, 2);
    assert_eq!(stats.emergency_count, 1);
    assert_eq!(stats.efficiency, 0.0);
}

#[test]
fn test_history_sampled_every_five_ticks_and_bounded() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    for _ in 0..4 {
        sim.step(Policy::RoundRobin, DensityTier::Medium);
    }
    assert!(sim.realtime_metrics().is_empty());

    for _ in 4..150 {
        sim.step(Policy::RoundRobin, DensityTier::Medium);
    }

    let times: Vec<u64> = sim.realtime_metrics().samples().map(|s| s.time).collect();
    assert_eq!(times.len(), 20);
    assert_eq!(times.first(), Some(&55));
    assert_eq!(times.last(), Some(&150));

    let latest = sim.realtime_metrics().latest().unwrap();
    let stats = sim.statistics();
    assert_eq!(latest.queue_length, stats.total_waiting);
    assert_eq!(latest.throughput, stats.metrics.throughput);
}

#[test]
fn test_reset_mid_run() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    for _ in 0..37 {
        sim.step(Policy::PriorityScheduling, DensityTier::High);
    }

    sim.reset();

    assert_eq!(sim.time(), 0);
    assert_eq!(sim.active_direction(), Direction::North);
    assert_eq!(sim.time_remaining(), sim.time_slice());
    assert!(sim.state().all_queues_empty());
    assert!(sim.crossing().is_empty());
    for direction in Direction::ALL {
        assert_eq!(sim.processed(direction), 0);
    }
    assert_eq!(sim.metrics(), Default::default());

    let result = sim.step(Policy::PriorityScheduling, DensityTier::High);
    assert_eq!(result.tick, 1);
}

#[test]
fn test_configuration_errors() {
    let cases = [
        SimulationConfig { time_slice: 0, ..SimulationConfig::default() },
        SimulationConfig { queue_capacity: 0, ..SimulationConfig::default() },
        SimulationConfig { history_interval: 0, ..SimulationConfig::default() },
        SimulationConfig { service_duration: (3, 2), ..SimulationConfig::default() },
        SimulationConfig { emergency_probability: -0.1, ..SimulationConfig::default() },
    ];

    for config in cases {
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }
}

#[test]
fn test_unknown_inputs_fail_fast() {
    assert!(matches!(
        "gridlock".parse::<Policy>(),
        Err(SimulationError::UnknownPolicy(_))
    ));
    assert!(matches!(
        "extreme".parse::<DensityTier>(),
        Err(SimulationError::UnknownDensity(_))
    ));
    assert!(matches!(
        "up".parse::<Direction>(),
        Err(SimulationError::UnknownDirection(_))
    ));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = SimulationConfig {
        rng_seed: 7,
        time_slice: 6,
        ..SimulationConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    // Missing fields fall back to defaults
    let partial: SimulationConfig = serde_json::from_str(r#"{"rng_seed": 1}"#).unwrap();
    assert_eq!(partial.time_slice, 10);
    assert_eq!(partial.queue_capacity, 15);
}
