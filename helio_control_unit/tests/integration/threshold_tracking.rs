//! Integration test: threshold stepper driving the full cycle.

use helio_common::tracker::state::{Axis, ControlMode, CrossQuadrant, SensorQuadrant};
use helio_control_unit::cycle::CycleRunner;
use helio_control_unit::sim::{SimulatedRig, SimulationConfig};

use super::mocks::{ManualClock, MockRemote, config_at, started_runner};

/// Vertical error 200, horizontal error 0.
fn vertical_bias_200() -> SensorQuadrant {
    SensorQuadrant::new(300, 300, 100, 100)
}

#[test]
fn vertical_clamps_at_upper_limit_and_stays() {
    let mut runner = started_runner(
        config_at(90, 90),
        vertical_bias_200(),
        MockRemote::new(ControlMode::Automatic),
    );
    // 90 is outside [1, 60]: the axis starts at the limit.
    assert_eq!(runner.angle(Axis::Vertical), 60);

    for _ in 0..30 {
        let report = runner.run_cycle();
        assert_eq!(report.error.map(|e| e.vertical), Some(200));
        assert_eq!(report.vertical, 60);
        assert_eq!(report.horizontal, 90);
    }
    // Start-up commands only; the clamped candidate never differs.
    assert_eq!(runner.actuator().commands(Axis::Vertical), [60]);
    assert_eq!(runner.actuator().commands(Axis::Horizontal), [90]);
}

#[test]
fn climbs_one_degree_per_cycle_then_holds() {
    let mut runner = started_runner(
        config_at(50, 90),
        vertical_bias_200(),
        MockRemote::new(ControlMode::Automatic),
    );
    let trace: Vec<i32> = (0..30).map(|_| runner.run_cycle().vertical).collect();

    let expected: Vec<i32> = (51..=60).chain(std::iter::repeat_n(60, 20)).collect();
    assert_eq!(trace, expected);
}

#[test]
fn dead_band_edge_issues_no_commands() {
    // Vertical error exactly 90 (= tolerance).
    let mut runner = started_runner(
        config_at(30, 90),
        SensorQuadrant::new(190, 190, 100, 100),
        MockRemote::new(ControlMode::Automatic),
    );
    let before = runner.actuator().log.len();
    for _ in 0..10 {
        let report = runner.run_cycle();
        assert_eq!(report.commanded, [false, false]);
    }
    assert_eq!(runner.actuator().log.len(), before);
    assert_eq!(runner.angle(Axis::Vertical), 30);
}

#[test]
fn just_outside_dead_band_steps() {
    // Vertical error 91, horizontal error -91 (right brighter).
    let mut runner = started_runner(
        config_at(30, 90),
        SensorQuadrant::new(191, 282, 100, 191),
        MockRemote::new(ControlMode::Automatic),
    );
    let report = runner.run_cycle();
    assert_eq!(report.error.map(|e| (e.vertical, e.horizontal)), Some((91, -91)));
    assert_eq!((report.vertical, report.horizontal), (31, 91));
}

#[test]
fn tracks_simulated_light_source_into_dead_band() {
    let sim = SimulationConfig {
        sun_vertical: 30.0,
        sun_horizontal: 100.0,
        vertical_drift: 0.0,
        horizontal_drift: 0.0,
        ..SimulationConfig::default()
    };
    let config = config_at(45, 175);
    let rig = SimulatedRig::new(sim, [45, 175]);
    let mut runner = CycleRunner::new(
        config,
        rig.sensor(),
        rig.actuator(),
        rig.remote(),
        ManualClock::new(),
    )
    .unwrap();
    runner.start();

    for _ in 0..200 {
        let report = runner.run_cycle();
        assert!((1..=60).contains(&report.vertical));
        assert!((5..=175).contains(&report.horizontal));
    }

    // Dead-band of 90 units at 30 units/deg: within 3 degrees.
    let world = rig.snapshot();
    assert!((world.panel[0] - 30).abs() <= 3, "vertical {}", world.panel[0]);
    assert!((world.panel[1] - 100).abs() <= 3, "horizontal {}", world.panel[1]);
    assert_eq!(world.panel, [runner.angle(Axis::Vertical), runner.angle(Axis::Horizontal)]);
}

#[test]
fn cross_layout_sensor_drives_automatic_cycle() {
    let mut runner = started_runner(
        config_at(30, 90),
        SensorQuadrant::uniform(0),
        MockRemote::new(ControlMode::Automatic),
    );
    // Top brighter by 200, right brighter by 150.
    runner.sensor_mut().cross = Some(CrossQuadrant {
        top: 300,
        bottom: 100,
        left: 100,
        right: 250,
    });

    let report = runner.run_cycle();
    assert_eq!(report.error.map(|e| (e.vertical, e.horizontal)), Some((200, -150)));
    assert_eq!((report.vertical, report.horizontal), (31, 91));
    assert_eq!(report.commanded, [true, true]);

    // Within the dead-band on both axes: no further movement.
    runner.sensor_mut().cross = Some(CrossQuadrant {
        top: 190,
        bottom: 100,
        left: 100,
        right: 100,
    });
    let report = runner.run_cycle();
    assert_eq!((report.vertical, report.horizontal), (31, 91));
    assert_eq!(report.commanded, [false, false]);
}
