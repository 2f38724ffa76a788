//! Hybrid Policy Integration Tests
//!
//! Emergency preemption resets the countdown without decrementing it;
//! otherwise a skip-empty round robin driven by a remembered cursor, with
//! the grant released as soon as the active queue empties.

use traffic_scheduler_core::{
    DensityTier, Direction, Event, Policy, Simulation, SimulationConfig, VehicleKind,
};

fn quiet() -> Simulation {
    Simulation::new(SimulationConfig {
        arrivals_enabled: false,
        ..SimulationConfig::default()
    })
    .unwrap()
}

fn inject(sim: &mut Simulation, direction: Direction, kind: VehicleKind, count: usize) {
    for _ in 0..count {
        sim.inject_vehicle(direction, kind, 2).unwrap();
    }
}

#[test]
fn test_preemption_resets_countdown_without_decrement() {
    let mut sim = quiet();
    inject(&mut sim, Direction::North, VehicleKind::Regular, 5);

    sim.step(Policy::Hybrid, DensityTier::Low);
    sim.step(Policy::Hybrid, DensityTier::Low);
    assert_eq!(sim.time_remaining(), 8);

    inject(&mut sim, Direction::East, VehicleKind::Emergency, 1);
    let result = sim.step(Policy::Hybrid, DensityTier::Low);

    assert_eq!(result.preempted_to, Some(Direction::East));
    assert_eq!(result.switched, None);
    assert_eq!(sim.active_direction(), Direction::East);
    assert_eq!(sim.time_remaining(), 10);
    assert_eq!(sim.statistics().direction_switches, 1);

    let preemptions = sim.event_log().events_of_type("Preemption");
    assert_eq!(preemptions.len(), 1);
    assert!(matches!(
        preemptions[0],
        Event::Preemption { tick: 3, from: Direction::North, to: Direction::East }
    ));
}

#[test]
fn test_preemption_leaves_round_robin_cursor() {
    let mut sim = quiet();
    inject(&mut sim, Direction::North, VehicleKind::Regular, 1);

    // North drains on tick 1; the all-empty scan moves the cursor to North
    sim.step(Policy::Hybrid, DensityTier::Low);
    assert_eq!(sim.signal().round_robin_cursor(), Direction::North);

    inject(&mut sim, Direction::West, VehicleKind::Emergency, 1);
    let result = sim.step(Policy::Hybrid, DensityTier::Low);

    assert_eq!(result.preempted_to, Some(Direction::West));
    assert_eq!(sim.active_direction(), Direction::West);
    assert_eq!(sim.signal().round_robin_cursor(), Direction::North);
}

#[test]
fn test_earlier_emergency_preempts_active_holding_emergency() {
    let mut sim = quiet();
    inject(&mut sim, Direction::East, VehicleKind::Regular, 6);
    inject(&mut sim, Direction::East, VehicleKind::Emergency, 1);

    let first = sim.step(Policy::Hybrid, DensityTier::Low);
    assert_eq!(first.preempted_to, Some(Direction::East));

    // East keeps an emergency at the back; North's comes first in cycle order
    inject(&mut sim, Direction::North, VehicleKind::Emergency, 1);
    let second = sim.step(Policy::Hybrid, DensityTier::Low);

    assert_eq!(second.preempted_to, Some(Direction::North));
    assert_eq!(sim.active_direction(), Direction::North);
    assert_eq!(sim.time_remaining(), 10);

    // North's emergency served; grant returns to East's waiting emergency
    let third = sim.step(Policy::Hybrid, DensityTier::Low);
    assert_eq!(sim.processed(Direction::North), 1);
    assert_eq!(third.preempted_to, Some(Direction::East));
    assert_eq!(sim.active_direction(), Direction::East);
}

#[test]
fn test_no_preemption_when_active_is_first_emergency() {
    let mut sim = quiet();
    inject(&mut sim, Direction::North, VehicleKind::Emergency, 2);
    inject(&mut sim, Direction::South, VehicleKind::Emergency, 1);

    let result = sim.step(Policy::Hybrid, DensityTier::Low);
    assert_eq!(result.preempted_to, None);
    assert_eq!(sim.active_direction(), Direction::North);
    assert_eq!(sim.time_remaining(), 9);
}

#[test]
fn test_empty_active_queue_releases_grant() {
    let mut sim = quiet();
    inject(&mut sim, Direction::North, VehicleKind::Regular, 2);
    inject(&mut sim, Direction::South, VehicleKind::Regular, 3);

    sim.step(Policy::Hybrid, DensityTier::Low);
    let result = sim.step(Policy::Hybrid, DensityTier::Low);

    // North drained on tick 2; cursor (West) scans N, E, S
    assert_eq!(result.switched, Some((Direction::North, Direction::South)));
    assert_eq!(sim.signal().round_robin_cursor(), Direction::South);

    for _ in 0..3 {
        sim.step(Policy::Hybrid, DensityTier::Low);
    }
    // Everything empty: next canonical slot after the cursor
    assert_eq!(sim.active_direction(), Direction::West);
    assert_eq!(sim.processed(Direction::South), 3);
}

#[test]
fn test_emergency_served_ahead_of_long_slice() {
    let mut sim = quiet();
    inject(&mut sim, Direction::North, VehicleKind::Regular, 12);
    inject(&mut sim, Direction::West, VehicleKind::Emergency, 1);

    let first = sim.step(Policy::Hybrid, DensityTier::Low);
    assert_eq!(first.preempted_to, Some(Direction::West));

    let second = sim.step(Policy::Hybrid, DensityTier::Low);
    let served = second.served.unwrap();
    assert!(sim
        .crossing()
        .iter()
        .any(|v| v.id() == served && v.is_emergency()));
}
