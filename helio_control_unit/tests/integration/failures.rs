//! Integration test: collaborator failures are transient and never fatal.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use helio_common::tracker::error::{DegradedFlags, TrackerError};
use helio_common::tracker::state::{Axis, ControlMode, SensorQuadrant};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use super::mocks::{MockRemote, balanced, config_at, started_runner, top_left_bias};

/// Layer counting WARN events.
#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn sensor_failure_means_no_movement() {
    let mut runner = started_runner(
        config_at(30, 90),
        top_left_bias(),
        MockRemote::new(ControlMode::Automatic),
    );
    assert_eq!(runner.run_cycle().vertical, 31);

    runner.sensor_mut().fail = true;
    for _ in 0..5 {
        let report = runner.run_cycle();
        assert_eq!((report.vertical, report.horizontal), (31, 89));
        assert!(report.error.is_none());
        assert!(report.degraded.contains(DegradedFlags::SENSOR));
        assert_eq!(report.commanded, [false, false]);
    }
    assert_eq!(runner.stats().sensor_failures, 5);

    runner.sensor_mut().fail = false;
    let report = runner.run_cycle();
    assert_eq!(report.vertical, 32);
    assert!(!report.degraded.contains(DegradedFlags::SENSOR));
}

#[test]
fn actuator_failure_keeps_angle_and_retries() {
    let mut runner = started_runner(
        config_at(30, 90),
        top_left_bias(),
        MockRemote::new(ControlMode::Automatic),
    );
    runner.actuator_mut().fail[Axis::Horizontal.index()] = true;

    let report = runner.run_cycle();
    assert_eq!(report.vertical, 31);
    assert_eq!(report.horizontal, 90);
    assert!(runner.axis(Axis::Horizontal).needs_sync());

    runner.actuator_mut().fail[Axis::Horizontal.index()] = false;
    let report = runner.run_cycle();
    assert_eq!(report.horizontal, 89);
    assert!(!runner.axis(Axis::Horizontal).needs_sync());
}

#[test]
fn pending_resend_goes_out_even_without_movement() {
    let mut runner = started_runner(
        config_at(30, 90),
        SensorQuadrant::uniform(500),
        MockRemote::new(ControlMode::Automatic),
    );
    assert_eq!(runner.run_cycle().commanded, [false, false]);

    // A failed manual move leaves the vertical axis out of sync.
    runner.actuator_mut().fail[Axis::Vertical.index()] = true;
    runner.remote_mut().queue.push_back(Ok(ControlMode::Manual));
    runner.remote_mut().manual = [Some(40), None];
    assert_eq!(runner.run_cycle().vertical, 30);
    assert!(runner.axis(Axis::Vertical).needs_sync());

    // Back in Automatic with a balanced sensor: target equals current, but
    // the failed axis is re-synchronised.
    runner.actuator_mut().fail[Axis::Vertical.index()] = false;
    let report = runner.run_cycle();
    assert_eq!(report.mode, ControlMode::Automatic);
    assert_eq!(report.commanded, [true, false]);
    assert_eq!(report.vertical, 30);
    assert!(!runner.axis(Axis::Vertical).needs_sync());
}

#[test]
fn persistent_actuator_failure_raises_degraded_flag() {
    let mut config = config_at(30, 90);
    config.actuator_degraded_after = 3;
    let mut runner = started_runner(
        config,
        top_left_bias(),
        MockRemote::new(ControlMode::Automatic),
    );
    runner.actuator_mut().fail[Axis::Vertical.index()] = true;

    let flags: Vec<bool> = (0..4)
        .map(|_| {
            runner
                .run_cycle()
                .degraded
                .contains(DegradedFlags::VERTICAL_ACTUATOR)
        })
        .collect();
    assert_eq!(flags, [false, false, true, true]);
    assert_eq!(runner.angle(Axis::Vertical), 30);
    assert_eq!(runner.axis(Axis::Vertical).consecutive_failures(), 4);
    assert!(!runner.degraded().contains(DegradedFlags::HORIZONTAL_ACTUATOR));

    runner.actuator_mut().fail[Axis::Vertical.index()] = false;
    let report = runner.run_cycle();
    assert!(!report.degraded.has_actuator_fault());
    assert_eq!(report.vertical, 31);
}

#[test]
fn manual_source_failure_leaves_axes_unchanged() {
    let mut remote = MockRemote::new(ControlMode::Manual);
    remote.manual = [Some(50), Some(50)];
    remote.manual_fail = true;
    let mut runner = started_runner(config_at(30, 90), top_left_bias(), remote);

    let report = runner.run_cycle();
    assert_eq!((report.vertical, report.horizontal), (30, 90));
    assert!(report.degraded.contains(DegradedFlags::REMOTE_SOURCE));
    assert_eq!(runner.stats().source_failures, 2);

    runner.remote_mut().manual_fail = false;
    let report = runner.run_cycle();
    assert_eq!((report.vertical, report.horizontal), (50, 50));
    assert!(report.degraded.is_empty());
}

#[test]
fn everything_failing_never_panics() {
    let mut runner = started_runner(
        config_at(30, 90),
        top_left_bias(),
        MockRemote::new(ControlMode::Automatic),
    );
    runner.sensor_mut().fail = true;
    runner.actuator_mut().fail = [true, true];
    runner.remote_mut().manual_fail = true;

    let modes = [ControlMode::Automatic, ControlMode::Manual, ControlMode::Stopped];
    for i in 0..300 {
        runner.remote_mut().queue.push_back(Ok(modes[i % 3]));
        let report = runner.run_cycle();
        assert_eq!((report.vertical, report.horizontal), (30, 90));
    }
    assert!(runner.degraded().has_actuator_fault());
    assert_eq!(runner.stats().cycle_count, 300);
}

#[test]
fn mode_source_outage_warns_once() {
    let mut remote = MockRemote::new(ControlMode::Automatic);
    for _ in 0..100 {
        remote
            .queue
            .push_back(Err(TrackerError::SourceUnavailable("broker offline".into())));
    }
    let mut runner = started_runner(config_at(30, 90), balanced(), remote);

    let warnings = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    tracing::subscriber::with_default(subscriber, || {
        for _ in 0..100 {
            let report = runner.run_cycle();
            assert_eq!(report.mode, ControlMode::Automatic);
            assert!(report.degraded.contains(DegradedFlags::REMOTE_SOURCE));
        }
    });

    assert_eq!(warnings.count(), 1);
    assert_eq!(runner.stats().source_failures, 100);
}

#[test]
fn manual_mode_without_target_still_resends() {
    let mut runner = started_runner(
        config_at(30, 90),
        top_left_bias(),
        MockRemote::scripted(&[ControlMode::Automatic, ControlMode::Manual]),
    );
    runner.actuator_mut().fail[Axis::Vertical.index()] = true;
    let report = runner.run_cycle();
    assert_eq!((report.vertical, report.horizontal), (30, 89));
    assert!(runner.axis(Axis::Vertical).needs_sync());

    // Manual with no remote angles: the failed axis is re-sent its angle.
    runner.actuator_mut().fail[Axis::Vertical.index()] = false;
    let report = runner.run_cycle();
    assert_eq!(report.mode, ControlMode::Manual);
    assert_eq!(report.commanded, [true, false]);
    assert_eq!((report.vertical, report.horizontal), (30, 89));
    assert!(!runner.axis(Axis::Vertical).needs_sync());
    assert_eq!(runner.actuator().commands(Axis::Vertical), [30, 30]);

    let report = runner.run_cycle();
    assert_eq!(report.commanded, [false, false]);
}
