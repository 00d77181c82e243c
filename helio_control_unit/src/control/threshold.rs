//! Threshold stepper: bang-bang control with a dead-band.
//!
//! Outside the dead-band the axis moves by exactly one degree per cycle,
//! whatever the error magnitude. The fixed step bounds the slew rate of the
//! servos.

use helio_common::tracker::state::Axis;

/// Step taken per cycle outside the dead-band [deg].
pub const STEP_DEG: i32 = 1;

/// Threshold stepper parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStepper {
    /// Dead-band half-width [sensor units].
    pub tolerance: i32,
}

impl ThresholdStepper {
    pub const fn new(tolerance: i32) -> Self {
        Self { tolerance }
    }

    /// Returns true if `error` lies inside the dead-band.
    #[inline]
    pub const fn in_dead_band(&self, error: i32) -> bool {
        error.unsigned_abs() <= self.tolerance.unsigned_abs()
    }

    /// Angle delta for `error` on `axis`: 0 or ±[`STEP_DEG`].
    #[inline]
    pub const fn delta(&self, axis: Axis, error: i32) -> i32 {
        if self.in_dead_band(error) {
            0
        } else if error > 0 {
            STEP_DEG * axis.direction()
        } else {
            -STEP_DEG * axis.direction()
        }
    }

    /// Unclamped candidate angle after one cycle.
    #[inline]
    pub const fn step(&self, axis: Axis, error: i32, current_angle: i32) -> i32 {
        current_angle.saturating_add(self.delta(axis, error))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
