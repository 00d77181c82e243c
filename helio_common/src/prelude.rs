//! Prelude module for common re-exports.
//!
//! ```rust
//! use helio_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::tracker::config::{AxisConfig, PidParams, StrategyConfig, TrackerConfig};

// ─── Domain ─────────────────────────────────────────────────────────
pub use crate::tracker::error::{DegradedFlags, TrackerError};
pub use crate::tracker::io::{ActuatorSink, Clock, RemoteSource, SensorReader, SystemClock};
pub use crate::tracker::state::{
    Axis, AxisLimits, ControlMode, CrossQuadrant, SensorQuadrant, SensorSample,
    TrackingError,
};
