//! # HELIO Control Unit Library
//!
//! Tracking control loop for a two-axis light tracker. Each cycle reads the
//! control mode, turns four quadrant light readings into per-axis errors,
//! steps each axis toward balance and clamps the result to the axis'
//! mechanical limits before commanding the actuators.
//!
//! ## Layers
//!
//! 1. **Estimator** — quadrant readings → tracking error (pure).
//! 2. **Control** — threshold or PID stepper → candidate angle; angle clamp.
//! 3. **State** — per-axis angle state and the mode arbiter.
//! 4. **Cycle** — the runner owning state and collaborators.
//!
//! Sensors, actuators, the remote mode source and the clock are traits from
//! `helio_common::tracker::io`; [`sim`] provides in-process implementations.

pub mod config;
pub mod control;
pub mod cycle;
pub mod estimator;
pub mod sim;
pub mod state;
