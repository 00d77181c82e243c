//! Runtime state owned by the control loop.
//!
//! One [`axis::AxisState`] per axis and one [`mode::ModeArbiter`]. Both are
//! mutated only by the cycle runner.

pub mod axis;
pub mod mode;
