//! Tick Driver Tests

use std::time::{Duration, Instant};
use traffic_scheduler_core::{SimulationError, SpeedMultiplier, TickDriver};

#[test]
fn test_period_is_one_second_over_speed() {
    for (speed, millis) in [(0.5, 2000), (1.0, 1000), (2.0, 500), (2.5, 400)] {
        let speed = SpeedMultiplier::new(speed).unwrap();
        assert_eq!(speed.period(), Duration::from_millis(millis));
    }
}

#[test]
fn test_out_of_range_speed_rejected() {
    for speed in [0.0, 0.25, 3.01, -1.0, f64::INFINITY] {
        assert!(matches!(
            SpeedMultiplier::new(speed),
            Err(SimulationError::SpeedOutOfRange(_))
        ));
    }
}

#[test]
fn test_driver_paces_ticks() {
    let mut driver = TickDriver::new(SpeedMultiplier::new(3.0).unwrap());
    let start = Instant::now();

    for _ in 0..3 {
        driver.wait();
    }

    // First tick is immediate, the next two wait one period each
    assert!(start.elapsed() >= driver.period() * 2);
    assert_eq!(driver.ticks(), 3);
}

#[test]
fn test_speed_change_updates_period() {
    let mut driver = TickDriver::new(SpeedMultiplier::default());
    driver.set_speed(SpeedMultiplier::new(2.0).unwrap());
    assert_eq!(driver.period(), Duration::from_millis(500));
    assert_eq!(driver.speed().value(), 2.0);
}
