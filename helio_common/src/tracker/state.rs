//! Value types for the tracker: axes, control modes, sensor samples.
//!
//! Enums use `#[repr(u8)]` so remote sources that only deliver plain
//! integers can be decoded with `from_u8`.

use serde::{Deserialize, Serialize};

// ─── Axis ───────────────────────────────────────────────────────────

/// One of the two rotational degrees of freedom of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Axis {
    /// Tilt (elevation) axis.
    Vertical = 0,
    /// Pan (azimuth) axis.
    Horizontal = 1,
}

impl Axis {
    /// Both axes in actuation order.
    pub const ALL: [Axis; 2] = [Axis::Vertical, Axis::Horizontal];

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Vertical),
            1 => Some(Self::Horizontal),
            _ => None,
        }
    }

    /// Array index of the axis (0 = vertical, 1 = horizontal).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }

    /// Angle direction that corrects a positive error on this axis.
    ///
    /// A positive vertical error (top brighter) raises the tilt angle; a
    /// positive horizontal error (left brighter) lowers the pan angle. The
    /// asymmetry comes from how the pan servo is mounted.
    #[inline]
    pub const fn direction(self) -> i32 {
        match self {
            Self::Vertical => 1,
            Self::Horizontal => -1,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Control Mode ───────────────────────────────────────────────────

/// Operating mode selected by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ControlMode {
    /// Sensors drive both axes.
    #[default]
    Automatic = 0,
    /// Remote targets drive both axes.
    Manual = 1,
    /// Both axes held at their parked angle.
    Stopped = 2,
}

impl ControlMode {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Automatic),
            1 => Some(Self::Manual),
            2 => Some(Self::Stopped),
            _ => None,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Mechanical Limits ──────────────────────────────────────────────

/// Inclusive mechanical range of one axis [deg].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: i32,
    pub max: i32,
}

impl AxisLimits {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns true if `angle` lies within `[min, max]`.
    #[inline]
    pub const fn contains(&self, angle: i32) -> bool {
        angle >= self.min && angle <= self.max
    }

    /// Returns true if the range is non-empty.
    #[inline]
    pub const fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

// ─── Sensor Samples ─────────────────────────────────────────────────

/// Raw readings of four sensors mounted in the corners of the shading cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorQuadrant {
    pub top_left: u16,
    pub top_right: u16,
    pub bottom_left: u16,
    pub bottom_right: u16,
}

impl SensorQuadrant {
    pub const fn new(top_left: u16, top_right: u16, bottom_left: u16, bottom_right: u16) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// All four sensors reporting the same value.
    pub const fn uniform(value: u16) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Raw readings of four sensors mounted on the arms of the shading cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrossQuadrant {
    pub top: u16,
    pub bottom: u16,
    pub left: u16,
    pub right: u16,
}

/// One sample from the sensor reader, in either physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorSample {
    Corners(SensorQuadrant),
    Cross(CrossQuadrant),
}

impl From<SensorQuadrant> for SensorSample {
    fn from(q: SensorQuadrant) -> Self {
        Self::Corners(q)
    }
}

impl From<CrossQuadrant> for SensorSample {
    fn from(q: CrossQuadrant) -> Self {
        Self::Cross(q)
    }
}

/// Directional error per axis, in sensor units.
///
/// Zero means balanced quadrants; the sign gives the brighter side
/// (positive vertical = top brighter, positive horizontal = left brighter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackingError {
    pub vertical: i32,
    pub horizontal: i32,
}

impl TrackingError {
    #[inline]
    pub const fn for_axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Vertical => self.vertical,
            Axis::Horizontal => self.horizontal,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
