//! Transient collaborator errors and degraded-status flags.
//!
//! None of these errors is fatal: the control unit skips the affected
//! update for the current cycle and retries on the next one. Persistent
//! failures are reported through [`DegradedFlags`].

use bitflags::bitflags;
use thiserror::Error;

use super::state::Axis;

/// Failure reported by one of the tracker's external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// A sensor channel could not be sampled.
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// The actuator of an axis did not accept the command.
    #[error("actuator unreachable on {axis} axis: {reason}")]
    ActuatorUnreachable { axis: Axis, reason: String },

    /// The remote mode/angle source did not answer.
    #[error("remote source unavailable: {0}")]
    SourceUnavailable(String),
}

impl TrackerError {
    /// Degraded flag raised while this error persists.
    pub const fn degraded_flag(&self) -> DegradedFlags {
        match self {
            Self::SensorUnavailable(_) => DegradedFlags::SENSOR,
            Self::ActuatorUnreachable {
                axis: Axis::Vertical,
                ..
            } => DegradedFlags::VERTICAL_ACTUATOR,
            Self::ActuatorUnreachable {
                axis: Axis::Horizontal,
                ..
            } => DegradedFlags::HORIZONTAL_ACTUATOR,
            Self::SourceUnavailable(_) => DegradedFlags::REMOTE_SOURCE,
        }
    }
}

bitflags! {
    /// Observable degraded status of the tracker.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DegradedFlags: u8 {
        /// Latest sensor read failed.
        const SENSOR              = 0x01;
        /// Vertical actuator failed repeatedly.
        const VERTICAL_ACTUATOR   = 0x02;
        /// Horizontal actuator failed repeatedly.
        const HORIZONTAL_ACTUATOR = 0x04;
        /// A remote read (mode or manual angle) failed this cycle.
        const REMOTE_SOURCE       = 0x08;
    }
}

impl DegradedFlags {
    /// Actuator flag for the given axis.
    #[inline]
    pub const fn actuator(axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Self::VERTICAL_ACTUATOR,
            Axis::Horizontal => Self::HORIZONTAL_ACTUATOR,
        }
    }

    /// Returns true if any actuator is degraded.
    #[inline]
    pub const fn has_actuator_fault(&self) -> bool {
        self.intersects(Self::VERTICAL_ACTUATOR.union(Self::HORIZONTAL_ACTUATOR))
    }
}
