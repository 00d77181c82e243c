//! Error estimator: four quadrant readings → one error per axis.
//!
//! Opposing pairs are averaged with integer division (truncating toward
//! zero) and subtracted. Dead-band tolerances are expressed against this
//! exact rounding.

use helio_common::tracker::state::{CrossQuadrant, SensorQuadrant, SensorSample, TrackingError};

/// Compute the tracking error of a corner-layout sample.
#[inline]
pub fn estimate(q: &SensorQuadrant) -> TrackingError {
    let tl = i32::from(q.top_left);
    let tr = i32::from(q.top_right);
    let bl = i32::from(q.bottom_left);
    let br = i32::from(q.bottom_right);

    let avg_top = (tl + tr) / 2;
    let avg_bottom = (bl + br) / 2;
    let avg_left = (tl + bl) / 2;
    let avg_right = (tr + br) / 2;

    TrackingError {
        vertical: avg_top - avg_bottom,
        horizontal: avg_left - avg_right,
    }
}

/// Compute the tracking error of a cross-layout sample.
///
/// Each arm carries a single sensor, so the "averages" are the readings.
#[inline]
pub fn estimate_cross(q: &CrossQuadrant) -> TrackingError {
    TrackingError {
        vertical: i32::from(q.top) - i32::from(q.bottom),
        horizontal: i32::from(q.left) - i32::from(q.right),
    }
}

/// Compute the tracking error of a sample in either layout.
#[inline]
pub fn estimate_sample(sample: &SensorSample) -> TrackingError {
    match sample {
        SensorSample::Corners(q) => estimate(q),
        SensorSample::Cross(q) => estimate_cross(q),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
