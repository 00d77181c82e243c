//! Control cycle: read mode → compute both targets → actuate.
//!
//! The runner owns every piece of mutable tracker state (axis angles, PID
//! accumulators, current mode) together with the four external
//! collaborators. One [`CycleRunner::run_cycle`] call completes a full
//! cycle; [`CycleRunner::run`] repeats it with a fixed delay in between.
//!
//! ## Cycle Body
//! 1. Read the mode from the remote source (failure keeps the old mode).
//! 2. Compute a clamped target for both axes:
//!    - Automatic: sensor → estimator → motion controller → clamp.
//!    - Manual: remote angle per axis → clamp (unavailable → axis untouched).
//!    - Stopped: parked angle.
//! 3. Send the targets to the actuator. An axis is commanded only when its
//!    target differs from the current angle, when a previous write failed,
//!    or in Stopped mode (parked angle re-issued every cycle).
//!
//! Both targets are computed before either actuator is written.
//!
//! ## Failure Policy
//! - Sensor failure: no movement this cycle.
//! - Actuator failure: angle kept, command retried next cycle; the axis is
//!   flagged degraded after `actuator_degraded_after` consecutive failures.
//! - Remote failure: previous mode retained, manual axis left at its angle.
//!
//! In every mode an axis whose last write failed is re-sent its current angle
//! when nothing else targets it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use helio_common::config::ConfigError;
use helio_common::tracker::config::TrackerConfig;
use helio_common::tracker::error::{DegradedFlags, TrackerError};
use helio_common::tracker::io::{ActuatorSink, Clock, RemoteSource, SensorReader};
use helio_common::tracker::state::{Axis, ControlMode, TrackingError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::control::strategy::MotionController;
use crate::estimator::estimate_sample;
use crate::state::axis::AxisState;
use crate::state::mode::ModeArbiter;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns] (0 until the first cycle).
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Cycles spent in each mode, indexed by `ControlMode as usize`.
    pub mode_cycles: [u64; 3],
    /// Failed sensor reads.
    pub sensor_failures: u64,
    /// Failed actuator writes (both axes).
    pub actuator_failures: u64,
    /// Failed remote reads (mode or manual angle).
    pub source_failures: u64,
}

impl CycleStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed cycle.
    #[inline]
    pub fn record(&mut self, duration: Duration, mode: ControlMode) {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        if self.cycle_count == 0 || ns < self.min_cycle_ns {
            self.min_cycle_ns = ns;
        }
        if ns > self.max_cycle_ns {
            self.max_cycle_ns = ns;
        }
        self.cycle_count += 1;
        self.last_cycle_ns = ns;
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(ns);
        self.mode_cycles[mode as usize] += 1;
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }

    /// Cycles spent in `mode`.
    #[inline]
    pub const fn cycles_in(&self, mode: ControlMode) -> u64 {
        self.mode_cycles[mode as usize]
    }
}

// ─── Cycle Report ───────────────────────────────────────────────────

/// Snapshot of the tracker after one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    /// Mode in effect for this cycle.
    pub mode: ControlMode,
    /// Tracking error, if the sensor was read this cycle.
    pub error: Option<TrackingError>,
    /// Vertical angle after the cycle [deg].
    pub vertical: i32,
    /// Horizontal angle after the cycle [deg].
    pub horizontal: i32,
    /// Axes that received a command this cycle, indexed by `Axis::index`.
    pub commanded: [bool; 2],
    /// Degraded status after the cycle.
    pub degraded: DegradedFlags,
}

impl CycleReport {
    #[inline]
    pub const fn angle(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Vertical => self.vertical,
            Axis::Horizontal => self.horizontal,
        }
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors while constructing the cycle runner.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("invalid tracker configuration: {0}")]
    Config(#[from] ConfigError),
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Target of one axis for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// Command if it differs from the current angle (or a resend is pending).
    Move(i32),
    /// Command unconditionally.
    Force(i32),
}

/// Single-threaded control loop over the four collaborators.
pub struct CycleRunner<S, A, R, C> {
    config: TrackerConfig,
    sensor: S,
    actuator: A,
    remote: R,
    clock: C,
    axes: [AxisState; 2],
    arbiter: ModeArbiter,
    controller: MotionController,
    degraded: DegradedFlags,
    stats: CycleStats,
}

impl<S, A, R, C> CycleRunner<S, A, R, C>
where
    S: SensorReader,
    A: ActuatorSink,
    R: RemoteSource,
    C: Clock,
{
    /// Create a runner from a tracker configuration and its collaborators.
    ///
    /// The configuration is validated again; axis angles start at the
    /// configured initial angles (clamped).
    pub fn new(
        config: TrackerConfig,
        sensor: S,
        actuator: A,
        remote: R,
        clock: C,
    ) -> Result<Self, CycleError> {
        config.validate()?;
        let axes = Axis::ALL.map(|axis| AxisState::new(axis, config.axis(axis)));
        let controller = MotionController::from_config(&config.strategy);
        let arbiter = ModeArbiter::new(config.initial_mode);

        info!(
            strategy = controller.name(),
            mode = %config.initial_mode,
            cycle_delay_ms = config.cycle_delay_ms,
            "Cycle runner created"
        );

        Ok(Self {
            config,
            sensor,
            actuator,
            remote,
            clock,
            axes,
            arbiter,
            controller,
            degraded: DegradedFlags::empty(),
            stats: CycleStats::new(),
        })
    }

    // ── Accessors ──────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[inline]
    pub fn axis(&self, axis: Axis) -> &AxisState {
        &self.axes[axis.index()]
    }

    #[inline]
    pub fn angle(&self, axis: Axis) -> i32 {
        self.axes[axis.index()].current_angle()
    }

    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.arbiter.mode()
    }

    #[inline]
    pub fn degraded(&self) -> DegradedFlags {
        self.degraded
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    #[inline]
    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Startup ────────────────────────────────────────────────

    /// Command the initial angles to both axes, then wait for the servos
    /// to settle.
    pub fn start(&mut self) {
        for axis in Axis::ALL {
            let angle = self.angle(axis);
            self.command(axis, angle);
        }
        info!(
            vertical = self.angle(Axis::Vertical),
            horizontal = self.angle(Axis::Horizontal),
            settle_ms = self.config.settle_delay_ms,
            "Initial position commanded"
        );
        self.clock.sleep(self.config.settle_delay());
    }

    // ── Cycle Body ─────────────────────────────────────────────

    /// Execute one full control cycle.
    pub fn run_cycle(&mut self) -> CycleReport {
        let cycle_start = self.clock.now();

        // 1. Mode.
        let read = self.remote.get_mode();
        let mode_failed = read.is_err();
        if let Err(e) = &read {
            self.stats.source_failures += 1;
            self.note_failure(e);
        }
        let update = self.arbiter.update(read);
        if update.is_change() && self.config.pid_reset_on_mode_change {
            self.controller.reset();
            debug!(strategy = self.controller.name(), "Controller state reset");
        }
        let mode = update.mode();

        // 2. Targets for both axes.
        let (targets, error, manual_failed) = match mode {
            ControlMode::Automatic => {
                let (targets, error) = self.automatic_targets();
                (targets, error, false)
            }
            ControlMode::Manual => {
                let (targets, failed) = self.manual_targets();
                (targets, None, failed)
            }
            ControlMode::Stopped => (self.parked_targets(), None, false),
        };
        self.degraded.set(
            DegradedFlags::REMOTE_SOURCE,
            mode_failed || manual_failed,
        );

        // 3. Actuate.
        let mut commanded = [false; 2];
        for axis in Axis::ALL {
            let state = &self.axes[axis.index()];
            let send = match targets[axis.index()] {
                Target::Move(angle) if state.should_command(angle) => Some(angle),
                Target::Move(_) => None,
                Target::Force(angle) => Some(angle),
            };
            if let Some(angle) = send {
                self.command(axis, angle);
                commanded[axis.index()] = true;
            }
        }

        let elapsed = self.clock.now().saturating_duration_since(cycle_start);
        self.stats.record(elapsed, mode);

        let report = CycleReport {
            cycle: self.stats.cycle_count,
            mode,
            error,
            vertical: self.angle(Axis::Vertical),
            horizontal: self.angle(Axis::Horizontal),
            commanded,
            degraded: self.degraded,
        };
        debug!(?report, "Cycle complete");
        report
    }

    fn automatic_targets(&mut self) -> ([Target; 2], Option<TrackingError>) {
        match self.sensor.read_quadrant() {
            Ok(sample) => {
                self.degraded.remove(DegradedFlags::SENSOR);
                let error = estimate_sample(&sample);
                let targets = Axis::ALL.map(|axis| {
                    let state = &self.axes[axis.index()];
                    let candidate = self.controller.candidate(
                        axis,
                        error.for_axis(axis),
                        state.current_angle(),
                    );
                    Target::Move(state.clamp(candidate))
                });
                (targets, Some(error))
            }
            Err(e) => {
                self.stats.sensor_failures += 1;
                self.note_failure(&e);
                self.degraded.insert(DegradedFlags::SENSOR);
                // No movement; only a pending resend goes out.
                let targets = self.axes.map(|s| Target::Move(s.current_angle()));
                (targets, None)
            }
        }
    }

    fn manual_targets(&mut self) -> ([Target; 2], bool) {
        let mut failed = false;
        // No new target: only a pending resend goes out.
        let mut targets = self.axes.map(|s| Target::Move(s.current_angle()));
        for axis in Axis::ALL {
            match self.remote.get_manual_angle(axis) {
                Ok(Some(angle)) => {
                    targets[axis.index()] = Target::Move(self.axes[axis.index()].clamp(angle));
                }
                Ok(None) => {}
                Err(e) => {
                    self.stats.source_failures += 1;
                    self.note_failure(&e);
                    failed = true;
                }
            }
        }
        (targets, failed)
    }

    fn parked_targets(&self) -> [Target; 2] {
        Axis::ALL.map(|axis| {
            let parked = self.config.axis(axis).parked_angle;
            Target::Force(self.axes[axis.index()].clamp(parked))
        })
    }

    /// Send `angle` to the actuator and update the axis on success.
    fn command(&mut self, axis: Axis, angle: i32) {
        let flag = DegradedFlags::actuator(axis);
        match self.actuator.set_angle(axis, angle) {
            Ok(()) => {
                self.axes[axis.index()].commit(angle);
                if self.degraded.contains(flag) {
                    self.degraded.remove(flag);
                    info!(%axis, angle, "Actuator recovered");
                }
            }
            Err(e) => {
                self.stats.actuator_failures += 1;
                let streak = self.axes[axis.index()].record_failure();
                if streak == 1 {
                    warn!(%axis, angle, error = %e, "Actuator command failed, retrying next cycle");
                } else {
                    debug!(%axis, angle, streak, error = %e, "Actuator command failed");
                }
                if streak >= self.config.actuator_degraded_after && !self.degraded.contains(flag) {
                    self.degraded.insert(flag);
                    warn!(%axis, streak, "Actuator degraded");
                }
            }
        }
    }

    /// Log a sensor/remote failure: WARN on the first one of a streak.
    fn note_failure(&self, error: &TrackerError) {
        if self.degraded.contains(error.degraded_flag()) {
            debug!(%error, "Collaborator still unavailable");
        } else {
            warn!(%error, "Collaborator unavailable, skipping update");
        }
    }

    // ── Loop ───────────────────────────────────────────────────

    /// Run cycles until `running` is cleared or `max_cycles` is reached.
    ///
    /// Call [`start`](Self::start) first. Returns the number of cycles
    /// executed by this call.
    pub fn run(&mut self, running: &AtomicBool, max_cycles: Option<u64>) -> u64 {
        let delay = self.config.cycle_delay();
        let interval = self.config.stats_interval;
        let mut executed = 0u64;

        while running.load(Ordering::SeqCst) {
            if max_cycles.is_some_and(|max| executed >= max) {
                break;
            }
            self.run_cycle();
            executed += 1;
            if self.stats.cycle_count % interval == 0 {
                self.log_stats();
            }
            self.clock.sleep(delay);
        }

        info!(executed, total = self.stats.cycle_count, "Cycle loop stopped");
        executed
    }

    /// Log the cycle statistics at INFO.
    pub fn log_stats(&self) {
        let s = &self.stats;
        info!(
            cycles = s.cycle_count,
            avg_ns = s.avg_cycle_ns(),
            min_ns = s.min_cycle_ns,
            max_ns = s.max_cycle_ns,
            automatic = s.cycles_in(ControlMode::Automatic),
            manual = s.cycles_in(ControlMode::Manual),
            stopped = s.cycles_in(ControlMode::Stopped),
            sensor_failures = s.sensor_failures,
            actuator_failures = s.actuator_failures,
            source_failures = s.source_failures,
            degraded = ?self.degraded,
            vertical = self.angle(Axis::Vertical),
            horizontal = self.angle(Axis::Horizontal),
            "Cycle stats"
        );
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
