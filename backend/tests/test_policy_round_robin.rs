//! RoundRobin Policy Integration Tests
//!
//! Grants rotate N→E→S→W on slice expiry only. Skip-empty (default) passes
//! over empty approaches; fixed-cycle does not.

use traffic_scheduler_core::{
    DensityTier, Direction, Event, Policy, RoundRobinMode, Simulation, SimulationConfig,
    VehicleKind,
};

fn preloaded(config: SimulationConfig, per_direction: usize) -> Simulation {
    let mut sim = Simulation::new(config).unwrap();
    for direction in Direction::ALL {
        for _ in 0..per_direction {
            sim.inject_vehicle(direction, VehicleKind::Regular, 2).unwrap();
        }
    }
    sim
}

fn switch_sequence(sim: &Simulation) -> Vec<(u64, Direction, Direction)> {
    sim.event_log()
        .events()
        .filter_map(|event| match event {
            Event::DirectionSwitch { tick, from, to, .. } => Some((*tick, *from, *to)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_forty_ticks_visit_each_direction_once() {
    // Medium density, emergencies never generated, every queue non-empty
    let config = SimulationConfig {
        emergency_probability: 0.0,
        ..SimulationConfig::default()
    };
    let mut sim = preloaded(config, 15);

    for tick in 1..=40u64 {
        let result = sim.step(Policy::RoundRobin, DensityTier::Medium);
        let expected = Direction::ALL[((tick - 1) / 10) as usize];
        assert!(result.served.is_some(), "tick {} idle", tick);
        if tick % 10 != 0 {
            assert_eq!(result.active_direction, expected);
        }
    }

    assert_eq!(sim.time(), 40);
    assert_eq!(sim.active_direction(), Direction::North);
    assert_eq!(
        switch_sequence(&sim),
        vec![
            (10, Direction::North, Direction::East),
            (20, Direction::East, Direction::South),
            (30, Direction::South, Direction::West),
            (40, Direction::West, Direction::North),
        ]
    );
    for direction in Direction::ALL {
        assert_eq!(sim.processed(direction), 10);
    }
}

#[test]
fn test_skip_empty_passes_over_empty_approaches() {
    let mut sim = Simulation::new(SimulationConfig {
        arrivals_enabled: false,
        ..SimulationConfig::default()
    })
    .unwrap();
    sim.inject_vehicle(Direction::South, VehicleKind::Regular, 2).unwrap();

    for _ in 0..10 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
    }

    assert_eq!(sim.active_direction(), Direction::South);
}

#[test]
fn test_fixed_cycle_grants_empty_approaches() {
    let mut sim = Simulation::new(SimulationConfig {
        arrivals_enabled: false,
        round_robin_mode: RoundRobinMode::FixedCycle,
        ..SimulationConfig::default()
    })
    .unwrap();
    sim.inject_vehicle(Direction::South, VehicleKind::Regular, 2).unwrap();

    for _ in 0..10 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
    }
    assert_eq!(sim.active_direction(), Direction::East);

    for _ in 0..10 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
    }
    assert_eq!(sim.active_direction(), Direction::South);
}

#[test]
fn test_emergency_does_not_cut_the_slice() {
    let mut sim = preloaded(
        SimulationConfig {
            arrivals_enabled: false,
            ..SimulationConfig::default()
        },
        3,
    );
    sim.inject_vehicle(Direction::West, VehicleKind::Emergency, 2).unwrap();

    for _ in 0..9 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
        assert_eq!(sim.active_direction(), Direction::North);
    }
}

#[test]
fn test_all_empty_advances_one_slot_per_slice() {
    let mut sim = Simulation::new(SimulationConfig {
        arrivals_enabled: false,
        ..SimulationConfig::default()
    })
    .unwrap();

    for _ in 0..30 {
        sim.step(Policy::RoundRobin, DensityTier::Low);
    }

    assert_eq!(sim.active_direction(), Direction::West);
    assert_eq!(sim.statistics().direction_switches, 3);
    assert_eq!(sim.metrics().utilization, 0.0);
}
