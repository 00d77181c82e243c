//! Discrete PID stepper.
//!
//! Set-point is fixed at 0 (balanced quadrants), so the error from the
//! estimator is fed in directly. The output is a bounded per-cycle angle
//! delta, not an absolute angle: the step shrinks as the panel approaches
//! balance.
//!
//! Integration and differentiation are per cycle, not per second. Cycle
//! timing is fixed by the runner.

use helio_common::tracker::config::PidParams;
use helio_common::tracker::state::Axis;

/// Internal state of one axis' PID stepper.
///
/// Preserves the integral accumulator and previous error across cycles.
/// Whether it is cleared on mode transitions is a runner policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    /// Sum of signed errors seen so far.
    integral: f64,
    /// Error of the previous cycle (for derivative).
    prev_error: f64,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub const fn integral(&self) -> f64 {
        self.integral
    }

    #[inline]
    pub const fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

/// Compute one PID cycle.
///
/// # Returns
/// Output clamped to `[output_min, output_max]` [deg].
#[inline]
pub fn pid_compute(state: &mut PidState, params: &PidParams, error: f64) -> f64 {
    // ── P term ──────────────────────────────────────────────
    let p_term = params.kp * error;

    // ── I term ──────────────────────────────────────────────
    state.integral += error;
    let i_term = params.ki * state.integral;

    // ── D term ──────────────────────────────────────────────
    let d_term = params.kd * (error - state.prev_error);

    state.prev_error = error;

    let raw = p_term + i_term + d_term;
    if raw < params.output_min {
        params.output_min
    } else if raw > params.output_max {
        params.output_max
    } else {
        raw
    }
}

/// PID stepper for both axes.
#[derive(Debug, Clone, Copy)]
pub struct PidStepper {
    params: PidParams,
    state: [PidState; 2],
}

impl PidStepper {
    pub fn new(params: PidParams) -> Self {
        Self {
            params,
            state: [PidState::default(); 2],
        }
    }

    #[inline]
    pub const fn params(&self) -> &PidParams {
        &self.params
    }

    #[inline]
    pub const fn state(&self, axis: Axis) -> &PidState {
        &self.state[axis.index()]
    }

    /// Angle delta for `error` on `axis`, rounded to whole degrees.
    ///
    /// The axis direction is applied after rounding so both axes share the
    /// sign convention of the threshold stepper.
    pub fn delta(&mut self, axis: Axis, error: i32) -> i32 {
        let output = pid_compute(&mut self.state[axis.index()], &self.params, f64::from(error));
        // `as` saturates on out-of-range floats; output is already bounded.
        (output.round() as i32).saturating_mul(axis.direction())
    }

    /// Unclamped candidate angle after one cycle.
    #[inline]
    pub fn step(&mut self, axis: Axis, error: i32, current_angle: i32) -> i32 {
        current_angle.saturating_add(self.delta(axis, error))
    }

    /// Clear both axes' accumulators.
    pub fn reset(&mut self) {
        for s in &mut self.state {
            s.reset();
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
