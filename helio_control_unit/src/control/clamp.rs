//! Angle clamp: the single enforcement point for mechanical limits.

use helio_common::tracker::state::AxisLimits;

/// Push `candidate` to the nearest bound of `[min, max]`.
///
/// Total over all of `i32`. Unlike `i32::clamp` it never panics; with
/// inverted bounds (`min > max`, rejected by config validation) the lower
/// bound wins.
#[inline]
pub const fn clamp_angle(candidate: i32, min: i32, max: i32) -> i32 {
    if candidate < min {
        min
    } else if candidate > max {
        max
    } else {
        candidate
    }
}

/// [`clamp_angle`] against an axis' limits.
#[inline]
pub const fn clamp_to(candidate: i32, limits: AxisLimits) -> i32 {
    clamp_angle(candidate, limits.min, limits.max)
}

// ─── Tests ──────────────────────────────────────────────────────────
