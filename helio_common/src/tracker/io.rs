//! Collaborator interfaces of the control unit.
//!
//! Sampling hardware, actuator transport, the remote mode/angle source and
//! the time base are all external to the tracking core. The control unit
//! only sees these traits, so a simulation rig, a hardware backend or a test
//! double can be plugged in without touching the control logic.
//!
//! # Timing Contracts
//!
//! | Operation | Blocking | Called |
//! |-----------|----------|--------|
//! | `read_quadrant()` | may block | once per Automatic cycle |
//! | `set_angle()` | may block | at most once per axis per cycle |
//! | `get_mode()` | may block | once per cycle |
//! | `get_manual_angle()` | may block | once per axis per Manual cycle |
//!
//! All calls happen from the single control thread, never concurrently.

use std::time::{Duration, Instant};

use super::error::TrackerError;
use super::state::{Axis, ControlMode, SensorSample};

/// Source of raw quadrant light readings.
pub trait SensorReader {
    /// Sample all four sensors.
    ///
    /// # Errors
    /// `TrackerError::SensorUnavailable` if a channel cannot be sampled.
    fn read_quadrant(&mut self) -> Result<SensorSample, TrackerError>;
}

/// Receiver of per-axis angle commands.
pub trait ActuatorSink {
    /// Command `axis` to `degrees`.
    ///
    /// # Errors
    /// `TrackerError::ActuatorUnreachable` if the command was not delivered.
    fn set_angle(&mut self, axis: Axis, degrees: i32) -> Result<(), TrackerError>;
}

/// Remote operator input: the requested mode and manual targets.
pub trait RemoteSource {
    /// Latest requested control mode.
    ///
    /// # Errors
    /// `TrackerError::SourceUnavailable` if the source did not answer.
    fn get_mode(&mut self) -> Result<ControlMode, TrackerError>;

    /// Latest manual target for `axis`, `None` if the operator has not set one.
    ///
    /// # Errors
    /// `TrackerError::SourceUnavailable` if the source did not answer.
    fn get_manual_angle(&mut self, axis: Axis) -> Result<Option<i32>, TrackerError>;
}

/// Time base used for cycle pacing.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time base backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
