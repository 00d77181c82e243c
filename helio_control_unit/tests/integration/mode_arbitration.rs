//! Integration test: mode arbitration across Automatic, Manual and Stopped.

use helio_common::tracker::config::{PidParams, StrategyConfig};
use helio_common::tracker::error::{DegradedFlags, TrackerError};
use helio_common::tracker::state::{Axis, ControlMode};
use helio_control_unit::control::strategy::MotionController;
use helio_control_unit::cycle::CycleRunner;
use helio_control_unit::sim::{RECENT_COMMANDS, RemoteStep, SimulatedRig, SimulationConfig};

use super::mocks::{
    ManualClock, MockRemote, balanced, config_at, started_runner, top_left_bias,
};

use ControlMode::*;

#[test]
fn automatic_automatic_manual_stopped_sequence() {
    let mut runner = started_runner(
        config_at(30, 90),
        top_left_bias(),
        MockRemote::scripted(&[Automatic, Automatic, Manual, Stopped]),
    );

    let angles: Vec<_> = (0..4)
        .map(|_| {
            let r = runner.run_cycle();
            (r.mode, r.vertical, r.horizontal)
        })
        .collect();

    assert_eq!(
        angles,
        [
            (Automatic, 31, 89),
            (Automatic, 32, 88),
            (Manual, 32, 88),
            (Stopped, 45, 90),
        ]
    );
}

#[test]
fn automatic_to_stopped_parks_within_one_cycle() {
    let mut runner = started_runner(
        config_at(20, 150),
        top_left_bias(),
        MockRemote::scripted(&[Automatic, Automatic, Automatic, Stopped]),
    );
    for _ in 0..3 {
        runner.run_cycle();
    }
    assert_ne!(runner.angle(Axis::Vertical), 45);

    let report = runner.run_cycle();
    assert_eq!(report.mode, Stopped);
    assert_eq!(report.commanded, [true, true]);
    assert_eq!(runner.angle(Axis::Vertical), 45);
    assert_eq!(runner.angle(Axis::Horizontal), 90);
    let log = &runner.actuator().log;
    assert_eq!(log[log.len() - 2..], [(Axis::Vertical, 45), (Axis::Horizontal, 90)]);
}

#[test]
fn stopped_ignores_sensor_and_manual_targets() {
    let mut remote = MockRemote::new(Stopped);
    remote.manual = [Some(10), Some(10)];
    let mut runner = started_runner(config_at(30, 30), top_left_bias(), remote);
    for _ in 0..5 {
        let report = runner.run_cycle();
        assert_eq!((report.vertical, report.horizontal), (45, 90));
        assert!(report.error.is_none());
    }
    assert_eq!(runner.sensor_mut().reads, 0);
}

#[test]
fn manual_without_source_leaves_angles_unchanged() {
    let mut runner = started_runner(config_at(30, 90), top_left_bias(), MockRemote::new(Manual));
    let commands_before = runner.actuator().log.len();
    for _ in 0..10 {
        let report = runner.run_cycle();
        assert_eq!((report.vertical, report.horizontal), (30, 90));
        assert_eq!(report.commanded, [false, false]);
    }
    assert_eq!(runner.actuator().log.len(), commands_before);
}

#[test]
fn manual_targets_are_clamped_per_axis() {
    let mut remote = MockRemote::new(Manual);
    remote.manual = [Some(100), Some(-20)];
    let mut runner = started_runner(config_at(30, 90), balanced(), remote);

    runner.run_cycle();
    assert_eq!(runner.angle(Axis::Vertical), 60);
    assert_eq!(runner.angle(Axis::Horizontal), 5);
}

#[test]
fn manual_single_axis_source() {
    let mut remote = MockRemote::new(Manual);
    remote.manual = [None, Some(120)];
    let mut runner = started_runner(config_at(30, 90), balanced(), remote);

    let report = runner.run_cycle();
    assert_eq!(report.commanded, [false, true]);
    assert_eq!((report.vertical, report.horizontal), (30, 120));
}

#[test]
fn manual_repeated_target_is_sent_once() {
    let mut remote = MockRemote::new(Manual);
    remote.manual = [Some(40), None];
    let mut runner = started_runner(config_at(30, 90), balanced(), remote);
    for _ in 0..5 {
        runner.run_cycle();
    }
    assert_eq!(runner.actuator().commands(Axis::Vertical), [30, 40]);
}

#[test]
fn mode_read_failure_retains_previous_mode() {
    let mut remote = MockRemote::new(Automatic);
    remote.queue.push_back(Ok(Manual));
    remote
        .queue
        .push_back(Err(TrackerError::SourceUnavailable("timeout".into())));
    remote.queue.push_back(Ok(Stopped));
    let mut runner = started_runner(config_at(30, 90), balanced(), remote);

    assert_eq!(runner.run_cycle().mode, Manual);
    let retained = runner.run_cycle();
    assert_eq!(retained.mode, Manual);
    assert!(retained.degraded.contains(DegradedFlags::REMOTE_SOURCE));
    let next = runner.run_cycle();
    assert_eq!(next.mode, Stopped);
    assert!(!next.degraded.contains(DegradedFlags::REMOTE_SOURCE));
}

fn integral_only() -> StrategyConfig {
    StrategyConfig::Pid(PidParams {
        kp: 0.0,
        ki: 0.001,
        kd: 0.0,
        output_min: -5.0,
        output_max: 5.0,
    })
}

fn vertical_integral(controller: &MotionController) -> f64 {
    match controller {
        MotionController::Pid(s) => s.state(Axis::Vertical).integral(),
        MotionController::Threshold(_) => panic!("expected pid controller"),
    }
}

#[test]
fn pid_state_survives_mode_change_by_default() {
    let mut config = config_at(30, 90);
    config.strategy = integral_only();
    let remote = MockRemote::scripted(&[Automatic, Automatic, Manual, Automatic]);
    let mut runner = started_runner(config, top_left_bias(), remote);

    for _ in 0..3 {
        runner.run_cycle();
    }
    assert_eq!(vertical_integral(runner.controller()), 1000.0);
    runner.run_cycle();
    assert_eq!(vertical_integral(runner.controller()), 1500.0);
}

#[test]
fn pid_state_reset_on_mode_change_when_configured() {
    let mut config = config_at(30, 90);
    config.strategy = integral_only();
    config.pid_reset_on_mode_change = true;
    let remote = MockRemote::scripted(&[Automatic, Automatic, Manual, Automatic]);
    let mut runner = started_runner(config, top_left_bias(), remote);

    for _ in 0..3 {
        runner.run_cycle();
    }
    assert_eq!(vertical_integral(runner.controller()), 0.0);
    runner.run_cycle();
    assert_eq!(vertical_integral(runner.controller()), 500.0);
}

#[test]
fn long_stopped_run_keeps_rig_command_log_bounded() {
    let sim = SimulationConfig {
        script: vec![RemoteStep {
            mode: Stopped,
            cycles: 1,
            vertical: None,
            horizontal: None,
        }],
        ..SimulationConfig::default()
    };
    let rig = SimulatedRig::new(sim, [30, 90]);
    let mut runner = CycleRunner::new(
        config_at(30, 90),
        rig.sensor(),
        rig.actuator(),
        rig.remote(),
        ManualClock::new(),
    )
    .unwrap();
    runner.start();
    for _ in 0..20_000 {
        runner.run_cycle();
    }

    let world = rig.snapshot();
    assert_eq!(world.commands, 2 + 2 * 20_000);
    assert_eq!(world.recent.len(), RECENT_COMMANDS);
    assert!(world.recent.iter().all(|&(axis, angle)| match axis {
        Axis::Vertical => angle == 45,
        Axis::Horizontal => angle == 90,
    }));
}
