//! Tracker configuration tables.
//!
//! All types use `serde::Deserialize` for TOML loading. Optional fields use
//! `#[serde(default = ...)]` so a minimal file only names what differs from
//! the reference rig (see [`crate::consts`]).
//!
//! # TOML Example
//!
//! ```toml
//! [tracker]
//! cycle_delay_ms = 10
//! initial_mode = "automatic"
//!
//! [tracker.vertical]
//! initial_angle = 45
//! min_angle = 1
//! max_angle = 60
//! parked_angle = 45
//!
//! [tracker.strategy]
//! kind = "threshold"
//! tolerance = 90
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{
    CYCLE_DELAY_MS_MAX, CYCLE_DELAY_MS_MIN, DEFAULT_ACTUATOR_DEGRADED_AFTER,
    DEFAULT_CYCLE_DELAY_MS, DEFAULT_PID_KD, DEFAULT_PID_KI, DEFAULT_PID_KP,
    DEFAULT_PID_OUTPUT_MAX, DEFAULT_PID_OUTPUT_MIN, DEFAULT_SETTLE_DELAY_MS,
    DEFAULT_STATS_INTERVAL, DEFAULT_TOLERANCE, HORIZONTAL_INITIAL_ANGLE, HORIZONTAL_MAX_ANGLE,
    HORIZONTAL_MIN_ANGLE, HORIZONTAL_PARKED_ANGLE, VERTICAL_INITIAL_ANGLE, VERTICAL_MAX_ANGLE,
    VERTICAL_MIN_ANGLE, VERTICAL_PARKED_ANGLE,
};

use super::state::{Axis, AxisLimits, ControlMode};

// ─── Per-Axis Config ────────────────────────────────────────────────

/// Mechanical configuration of one axis [deg].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Angle commanded at startup (clamped into the limits).
    pub initial_angle: i32,
    /// Lower mechanical limit.
    pub min_angle: i32,
    /// Upper mechanical limit.
    pub max_angle: i32,
    /// Safe angle used in Stopped mode.
    pub parked_angle: i32,
}

impl AxisConfig {
    /// Reference configuration for `axis`.
    pub const fn reference(axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Self {
                initial_angle: VERTICAL_INITIAL_ANGLE,
                min_angle: VERTICAL_MIN_ANGLE,
                max_angle: VERTICAL_MAX_ANGLE,
                parked_angle: VERTICAL_PARKED_ANGLE,
            },
            Axis::Horizontal => Self {
                initial_angle: HORIZONTAL_INITIAL_ANGLE,
                min_angle: HORIZONTAL_MIN_ANGLE,
                max_angle: HORIZONTAL_MAX_ANGLE,
                parked_angle: HORIZONTAL_PARKED_ANGLE,
            },
        }
    }

    #[inline]
    pub const fn limits(&self) -> AxisLimits {
        AxisLimits::new(self.min_angle, self.max_angle)
    }

    /// Validate limit ordering and parked angle placement.
    pub fn validate(&self, axis: Axis) -> Result<(), String> {
        if !self.limits().is_ordered() {
            return Err(format!(
                "{axis}: min_angle {} greater than max_angle {}",
                self.min_angle, self.max_angle
            ));
        }
        if !self.limits().contains(self.parked_angle) {
            return Err(format!(
                "{axis}: parked_angle {} out of range [{}, {}]",
                self.parked_angle, self.min_angle, self.max_angle
            ));
        }
        Ok(())
    }
}

fn default_vertical() -> AxisConfig {
    AxisConfig::reference(Axis::Vertical)
}
fn default_horizontal() -> AxisConfig {
    AxisConfig::reference(Axis::Horizontal)
}

// ─── Motion Strategy ────────────────────────────────────────────────

/// PID gains and output bounds, shared by both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidParams {
    #[serde(default = "default_kp")]
    pub kp: f64,
    #[serde(default = "default_ki")]
    pub ki: f64,
    #[serde(default = "default_kd")]
    pub kd: f64,
    /// Lower bound of the per-cycle angle delta [deg].
    #[serde(default = "default_output_min")]
    pub output_min: f64,
    /// Upper bound of the per-cycle angle delta [deg].
    #[serde(default = "default_output_max")]
    pub output_max: f64,
}

fn default_kp() -> f64 {
    DEFAULT_PID_KP
}
fn default_ki() -> f64 {
    DEFAULT_PID_KI
}
fn default_kd() -> f64 {
    DEFAULT_PID_KD
}
fn default_output_min() -> f64 {
    DEFAULT_PID_OUTPUT_MIN
}
fn default_output_max() -> f64 {
    DEFAULT_PID_OUTPUT_MAX
}

impl Default for PidParams {
    fn default() -> Self {
        Self {
            kp: DEFAULT_PID_KP,
            ki: DEFAULT_PID_KI,
            kd: DEFAULT_PID_KD,
            output_min: DEFAULT_PID_OUTPUT_MIN,
            output_max: DEFAULT_PID_OUTPUT_MAX,
        }
    }
}

impl PidParams {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("kp", self.kp),
            ("ki", self.ki),
            ("kd", self.kd),
            ("output_min", self.output_min),
            ("output_max", self.output_max),
        ] {
            if !value.is_finite() {
                return Err(format!("pid.{name} must be finite, got {value}"));
            }
        }
        if self.output_min > self.output_max {
            return Err(format!(
                "pid.output_min {} greater than output_max {}",
                self.output_min, self.output_max
            ));
        }
        Ok(())
    }
}

/// Motion strategy selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrategyConfig {
    /// Fixed 1-degree steps outside a dead-band.
    Threshold {
        #[serde(default = "default_tolerance")]
        tolerance: i32,
    },
    /// Bounded PID delta per cycle.
    Pid(PidParams),
}

fn default_tolerance() -> i32 {
    DEFAULT_TOLERANCE
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::Threshold {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Threshold { tolerance } if *tolerance < 0 => {
                Err(format!("tolerance must be >= 0, got {tolerance}"))
            }
            Self::Threshold { .. } => Ok(()),
            Self::Pid(params) => params.validate(),
        }
    }
}

// ─── Top-Level Tracker Config ───────────────────────────────────────

/// `[tracker]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Delay between two control cycles [ms].
    #[serde(default = "default_cycle_delay_ms")]
    pub cycle_delay_ms: u64,

    /// Wait after the initial positioning, before the first cycle [ms].
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Mode assumed until the remote source answers for the first time.
    #[serde(default)]
    pub initial_mode: ControlMode,

    /// Clear PID integral/derivative history whenever the mode changes.
    #[serde(default)]
    pub pid_reset_on_mode_change: bool,

    /// Consecutive actuator failures before the axis is flagged degraded.
    #[serde(default = "default_degraded_after")]
    pub actuator_degraded_after: u32,

    /// Cycles between two statistics log lines.
    #[serde(default = "default_stats_interval")]
    pub stats_interval: u64,

    #[serde(default = "default_vertical")]
    pub vertical: AxisConfig,

    #[serde(default = "default_horizontal")]
    pub horizontal: AxisConfig,

    #[serde(default)]
    pub strategy: StrategyConfig,
}

fn default_cycle_delay_ms() -> u64 {
    DEFAULT_CYCLE_DELAY_MS
}
fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}
fn default_degraded_after() -> u32 {
    DEFAULT_ACTUATOR_DEGRADED_AFTER
}
fn default_stats_interval() -> u64 {
    DEFAULT_STATS_INTERVAL
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            cycle_delay_ms: DEFAULT_CYCLE_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            initial_mode: ControlMode::default(),
            pid_reset_on_mode_change: false,
            actuator_degraded_after: DEFAULT_ACTUATOR_DEGRADED_AFTER,
            stats_interval: DEFAULT_STATS_INTERVAL,
            vertical: default_vertical(),
            horizontal: default_horizontal(),
            strategy: StrategyConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Configuration of `axis`.
    #[inline]
    pub const fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }

    #[inline]
    pub const fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }

    #[inline]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_delay_ms < CYCLE_DELAY_MS_MIN || self.cycle_delay_ms > CYCLE_DELAY_MS_MAX {
            return Err(ConfigError::ValidationError(format!(
                "cycle_delay_ms {} out of range [{}, {}]",
                self.cycle_delay_ms, CYCLE_DELAY_MS_MIN, CYCLE_DELAY_MS_MAX
            )));
        }
        if self.actuator_degraded_after == 0 {
            return Err(ConfigError::ValidationError(
                "actuator_degraded_after must be > 0".to_string(),
            ));
        }
        if self.stats_interval == 0 {
            return Err(ConfigError::ValidationError(
                "stats_interval must be > 0".to_string(),
            ));
        }
        for axis in Axis::ALL {
            self.axis(axis)
                .validate(axis)
                .map_err(ConfigError::ValidationError)?;
        }
        self.strategy
            .validate()
            .map_err(ConfigError::ValidationError)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
