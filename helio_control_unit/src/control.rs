//! Control engine root.
//!
//! Two interchangeable motion strategies (threshold stepper, PID stepper)
//! produce an unclamped candidate angle; the angle clamp is the only place
//! that turns a candidate into an angle an axis may hold.

pub mod clamp;
pub mod pid;
pub mod strategy;
pub mod threshold;
