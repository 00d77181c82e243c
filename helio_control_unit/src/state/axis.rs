//! Per-axis angle state.
//!
//! `current_angle` is the last angle the actuator accepted. It always lies
//! within the axis limits: every write goes through the angle clamp.

use helio_common::tracker::config::AxisConfig;
use helio_common::tracker::state::{Axis, AxisLimits};

use crate::control::clamp::clamp_to;

/// Angle state of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisState {
    axis: Axis,
    limits: AxisLimits,
    /// Last angle the actuator accepted [deg].
    current_angle: i32,
    /// Hardware position unknown or last write failed; resend next cycle.
    needs_sync: bool,
    /// Consecutive actuator failures.
    consecutive_failures: u32,
}

impl AxisState {
    /// Create from config. The initial angle is clamped into the limits.
    pub const fn new(axis: Axis, config: &AxisConfig) -> Self {
        let limits = config.limits();
        Self {
            axis,
            limits,
            current_angle: clamp_to(config.initial_angle, limits),
            needs_sync: true,
            consecutive_failures: 0,
        }
    }

    #[inline]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub const fn limits(&self) -> AxisLimits {
        self.limits
    }

    #[inline]
    pub const fn current_angle(&self) -> i32 {
        self.current_angle
    }

    #[inline]
    pub const fn needs_sync(&self) -> bool {
        self.needs_sync
    }

    #[inline]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Clamp a candidate angle into this axis' limits.
    #[inline]
    pub const fn clamp(&self, candidate: i32) -> i32 {
        clamp_to(candidate, self.limits)
    }

    /// Whether `target` must be sent to the actuator this cycle.
    #[inline]
    pub const fn should_command(&self, target: i32) -> bool {
        self.needs_sync || target != self.current_angle
    }

    /// Record that the actuator accepted `angle`. The angle is clamped
    /// again so the invariant cannot be broken by a caller.
    pub fn commit(&mut self, angle: i32) {
        self.current_angle = self.clamp(angle);
        self.needs_sync = false;
        self.consecutive_failures = 0;
    }

    /// Record an actuator failure. Returns the new failure streak length.
    pub fn record_failure(&mut self) -> u32 {
        self.needs_sync = true;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.consecutive_failures
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
