//! HELIO Common Library
//!
//! Shared domain types, collaborator interfaces and configuration loading for
//! the HELIO two-axis light tracker workspace.
//!
//! # Module Structure
//!
//! - [`tracker`] - Axis/mode/sensor types, error taxonomy, collaborator traits
//!   and tracker configuration
//! - [`config`] - Configuration loading trait and shared config types
//! - [`consts`] - Default values taken from the reference tracker hardware
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use helio_common::prelude::*;
//!
//! let limits = AxisLimits::new(1, 60);
//! assert!(limits.contains(45));
//! assert_eq!(ControlMode::from_u8(2), Some(ControlMode::Stopped));
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod tracker;
