// tests/navigation_tests.rs
// Properties of the navigation primitives: selector, heading integrator,
// classifier, range PID and wheel command mapping.

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use proxnav::config::{PidConfig, SpeedConfig, ThresholdConfig};
use proxnav::core::{HeadingIntegrator, ObstacleClassifier};
use proxnav::navigation::{MotionIntent, MotorCommandMapper, RangeDirectionSelector};
use proxnav::{ControllerConfig, MotorCommand, ProximityFrame, RangePid, TurnDirection};
use rstest::rstest;

#[rstest]
#[case([0; 8])]
#[case([50; 8])]
#[case([10, 90, 10, 50, 90, 0, 10, 5])]
#[case([u16::MAX, 0, 1, 2, 3, 4, 5, 6])]
#[case([7, 6, 5, 4, 3, 2, 1, 0])]
fn selector_visits_every_rank_within_eight_calls(#[case] values: [u16; 8]) {
    let frame = ProximityFrame::new(values);
    let mut selector = RangeDirectionSelector::new();

    let mut ranks = HashSet::new();
    let mut sensors = HashSet::new();
    for _ in 0..8 {
        let sensor = selector.select(&frame);
        assert!(sensor < 8);
        sensors.insert(sensor);
        ranks.insert(selector.state().select_count);
    }
    assert_eq!(ranks.len(), 8);
    assert_eq!(sensors.len(), 8);
    // a full cycle returns the cursor to its start
    assert_eq!(selector.state().select_count, 0);
}

#[test]
fn selector_jumps_by_three_ranks() {
    let frame = ProximityFrame::new([80, 70, 60, 50, 40, 30, 20, 10]);
    let mut selector = RangeDirectionSelector::new();
    let picks: Vec<usize> = (0..4).map(|_| selector.select(&frame)).collect();
    assert_eq!(picks, vec![3, 6, 1, 4]);
}

#[test]
fn heading_integrates_rate_times_time() {
    let mut heading = HeadingIntegrator::new(0.01);
    heading.begin(1.0, TurnDirection::Clockwise);

    for _ in 0..7 {
        heading.integrate(0.5, 0.25);
        assert!(!heading.target_reached());
    }
    assert_relative_eq!(heading.state().current_angle, 0.875);
    heading.integrate(0.5, 0.25);
    assert_relative_eq!(heading.state().current_angle, 1.0);
    assert!(heading.target_reached());
}

#[test]
fn counter_clockwise_turn_reaches_quarter_turn() {
    let mut heading = HeadingIntegrator::new(0.05);
    heading.begin(-FRAC_PI_2, TurnDirection::CounterClockwise);
    heading.integrate(1.0, 1.0);
    assert!(!heading.quarter_turn_reached());
    heading.integrate(1.0, 1.0);
    assert_relative_eq!(heading.state().current_angle, -2.0);
    assert!(heading.quarter_turn_reached());
    assert!(heading.target_reached());
}

#[test]
fn short_intervals_count_as_one_tick() {
    let mut heading = HeadingIntegrator::new(0.05);
    heading.begin(1.0, TurnDirection::Clockwise);
    heading.integrate(2.0, 0.0);
    heading.integrate(2.0, f32::NAN);
    assert_relative_eq!(heading.state().current_angle, 0.2);
}

#[rstest]
#[case([45, 0, 0, 0, 0, 0, 0, 50], true)]
#[case([30, 0, 0, 0, 0, 0, 0, 50], false)]
#[case([45, 0, 0, 0, 0, 0, 0, 40], false)]
fn target_detection_needs_both_front_sensors(#[case] values: [u16; 8], #[case] expected: bool) {
    let thresholds = ThresholdConfig {
        range_threshold: 40,
        ..ThresholdConfig::default()
    };
    let classifier = ObstacleClassifier::new(thresholds);
    assert_eq!(classifier.target_detected(&ProximityFrame::new(values)), expected);
}

#[rstest]
#[case(300, false, false)]
#[case(301, true, false)]
#[case(210, false, true)]
#[case(211, false, false)]
fn obstacle_and_release_thresholds(
    #[case] reading: u16,
    #[case] obstacle: bool,
    #[case] clear: bool,
) {
    let classifier = ObstacleClassifier::new(ThresholdConfig::default());
    let frame = ProximityFrame::new([0, reading, 0, 0, 0, 0, 0, 0]);
    assert_eq!(classifier.obstacle_ahead(&frame), obstacle);
    assert_eq!(classifier.path_clear(&frame), clear);
}

#[test]
fn pid_is_silent_at_the_standoff_distance() {
    let mut pid = RangePid::new(&PidConfig::default(), 1000.0, 0.05);
    for _ in 0..10 {
        assert_eq!(pid.update(20.0, 20.0, 0.05), 0.0);
    }
    assert_eq!(pid.state().integral, 0.0);
}

#[test]
fn zero_error_settles_to_the_accumulated_integral() {
    let mut pid = RangePid::new(&PidConfig::default(), 1000.0, 0.05);
    for _ in 0..5 {
        pid.update(20.0, 40.0, 0.05);
    }
    let integral = pid.state().integral;
    assert_relative_eq!(integral, 5.0, max_relative = 1e-5);

    // the first zero-error tick still carries the derivative kick
    let kick = pid.update(20.0, 20.0, 0.05);
    assert_relative_eq!(kick, 2.0 * integral - 1.5 * 20.0 / 0.05, max_relative = 1e-4);

    for _ in 0..3 {
        let output = pid.update(20.0, 20.0, 0.05);
        assert_relative_eq!(output, 2.0 * integral);
        assert_eq!(pid.state().integral, integral);
    }
}

#[rstest]
#[case(5000.0, 1000.0)]
#[case(-5000.0, -1000.0)]
fn pid_saturates_and_stays_saturated(#[case] measured: f32, #[case] limit: f32) {
    let mut pid = RangePid::new(&PidConfig::default(), 1000.0, 0.05);
    for _ in 0..50 {
        assert_eq!(pid.update(20.0, measured, 0.05), limit);
    }
    // no anti-windup
    assert!(pid.state().integral.abs() > 10_000.0);
}

#[test]
fn pid_reset_clears_history() {
    let mut pid = RangePid::new(&PidConfig::default(), 1000.0, 0.05);
    pid.update(20.0, 100.0, 0.05);
    pid.reset();
    assert_eq!(pid.state().integral, 0.0);
    assert_eq!(pid.state().last_error, 0.0);
}

#[rstest]
#[case(MotionIntent::Translate(5000.0), MotorCommand::new(1100, 1100))]
#[case(MotionIntent::Translate(-5000.0), MotorCommand::new(-1100, -1100))]
#[case(MotionIntent::Translate(f32::NAN), MotorCommand::STOP)]
#[case(MotionIntent::Translate(f32::INFINITY), MotorCommand::new(1100, 1100))]
#[case(
    MotionIntent::Drive { turn_rate: 900.0, linear_speed: 900.0 },
    MotorCommand::new(1100, 0)
)]
#[case(MotionIntent::Stop, MotorCommand::STOP)]
fn wheel_commands_never_exceed_the_limit(#[case] intent: MotionIntent, #[case] expected: MotorCommand) {
    let mapper = MotorCommandMapper::new(&SpeedConfig::default(), [8.0, 4.0, 2.0]);
    let command = mapper.map(intent);
    assert_eq!(command, expected);
    assert!(command.left_speed.abs() <= 1100);
    assert!(command.right_speed.abs() <= 1100);
}

#[test]
fn repulsion_steers_away_from_the_nearer_side() {
    let mapper = MotorCommandMapper::new(&SpeedConfig::default(), [1.0, 0.5, 0.25]);
    let command = mapper.map(MotionIntent::Repel(ProximityFrame::new([
        200, 100, 0, 0, 0, 0, 0, 40,
    ])));
    // left: 550 - (200 + 50), right: 550 - 40
    assert_eq!(command, MotorCommand::new(300, 510));
    assert!(command.left_speed < command.right_speed);
}

#[rstest]
#[case(include_str!("../config/explore.yaml"))]
#[case(include_str!("../config/sweep.yaml"))]
#[case(include_str!("../config/chase.yaml"))]
#[case(include_str!("../config/wander.yaml"))]
fn shipped_configurations_are_valid(#[case] yaml: &str) {
    let config = ControllerConfig::from_yaml_str(yaml).unwrap();
    assert!(config.validate().is_ok());
    assert!(config.tick_seconds() > 0.0);
}
