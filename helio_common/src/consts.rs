//! Default constants for the HELIO workspace.
//!
//! Values mirror the reference tracker rig: two hobby servos driven from a
//! 10-bit ADC reading four light-dependent resistors.

use static_assertions::const_assert;

/// Largest raw value a quadrant sensor can report (10-bit ADC).
pub const SENSOR_MAX: u16 = 1023;

/// Default dead-band tolerance of the threshold stepper [sensor units].
pub const DEFAULT_TOLERANCE: i32 = 90;

/// Default delay between two control cycles [ms].
pub const DEFAULT_CYCLE_DELAY_MS: u64 = 10;

/// Allowed cycle delay range [ms].
pub const CYCLE_DELAY_MS_MIN: u64 = 1;
pub const CYCLE_DELAY_MS_MAX: u64 = 60_000;

/// Default settle time after the initial positioning [ms].
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2_500;

/// Consecutive actuator failures before an axis is reported as degraded.
pub const DEFAULT_ACTUATOR_DEGRADED_AFTER: u32 = 50;

/// Cycles between two statistics log lines.
pub const DEFAULT_STATS_INTERVAL: u64 = 1_000;

/// Vertical (tilt) axis defaults [deg].
pub const VERTICAL_INITIAL_ANGLE: i32 = 45;
pub const VERTICAL_MIN_ANGLE: i32 = 1;
pub const VERTICAL_MAX_ANGLE: i32 = 60;
pub const VERTICAL_PARKED_ANGLE: i32 = 45;

/// Horizontal (pan) axis defaults [deg].
///
/// The initial angle lies above the upper limit on the reference rig; it is
/// pulled into range by the angle clamp at startup.
pub const HORIZONTAL_INITIAL_ANGLE: i32 = 180;
pub const HORIZONTAL_MIN_ANGLE: i32 = 5;
pub const HORIZONTAL_MAX_ANGLE: i32 = 175;
pub const HORIZONTAL_PARKED_ANGLE: i32 = 90;

/// Default PID gains, tuned for a ±5 degree step per cycle.
pub const DEFAULT_PID_KP: f64 = 0.02;
pub const DEFAULT_PID_KI: f64 = 0.0005;
pub const DEFAULT_PID_KD: f64 = 0.01;
pub const DEFAULT_PID_OUTPUT_MIN: f64 = -5.0;
pub const DEFAULT_PID_OUTPUT_MAX: f64 = 5.0;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/tracker.toml";

const_assert!(VERTICAL_MIN_ANGLE <= VERTICAL_PARKED_ANGLE);
const_assert!(VERTICAL_PARKED_ANGLE <= VERTICAL_MAX_ANGLE);
const_assert!(HORIZONTAL_MIN_ANGLE <= HORIZONTAL_PARKED_ANGLE);
const_assert!(HORIZONTAL_PARKED_ANGLE <= HORIZONTAL_MAX_ANGLE);
const_assert!(DEFAULT_CYCLE_DELAY_MS >= CYCLE_DELAY_MS_MIN);
