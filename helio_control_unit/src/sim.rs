//! Simulation rig: a drifting light source, a quadrant sensor model, a
//! recording actuator and a scripted remote source.
//!
//! Lets the control unit run without hardware. All three collaborators share
//! one [`SimWorld`] through `Rc<RefCell<_>>`; the tracker is single-threaded.
//!
//! ## Sensor Model
//! The light source and the panel are both described in actuator angles.
//! With `dv = sun_vertical - panel_vertical` and
//! `dh = panel_horizontal - sun_horizontal` (the horizontal axis turns the
//! other way), each corner reads
//! `ambient + gain * (±dv ± dh)` clamped to `[0, SENSOR_MAX]`, `+dv` for the
//! top row and `+dh` for the left column.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use helio_common::consts::SENSOR_MAX;
use helio_common::tracker::error::TrackerError;
use helio_common::tracker::io::{ActuatorSink, RemoteSource, SensorReader};
use helio_common::tracker::state::{Axis, ControlMode, SensorQuadrant, SensorSample};
use serde::{Deserialize, Serialize};
use tracing::trace;

// ─── Configuration ──────────────────────────────────────────────────

/// `[simulation]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Light source position at start, vertical [deg].
    #[serde(default = "default_sun_vertical")]
    pub sun_vertical: f64,
    /// Light source position at start, horizontal [deg].
    #[serde(default = "default_sun_horizontal")]
    pub sun_horizontal: f64,
    /// Light source drift per sensor read, vertical [deg].
    #[serde(default = "default_vertical_drift")]
    pub vertical_drift: f64,
    /// Light source drift per sensor read, horizontal [deg].
    #[serde(default = "default_horizontal_drift")]
    pub horizontal_drift: f64,
    /// Reading of a sensor with the panel aligned [sensor units].
    #[serde(default = "default_ambient")]
    pub ambient: u16,
    /// Reading change per degree of pointing error [sensor units/deg].
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Every n-th sensor read fails (0 = never).
    #[serde(default)]
    pub sensor_fail_every: u64,
    /// Every n-th actuator write fails (0 = never).
    #[serde(default)]
    pub actuator_fail_every: u64,
    /// Remote mode script. Empty = Automatic forever.
    #[serde(default)]
    pub script: Vec<RemoteStep>,
}

fn default_sun_vertical() -> f64 {
    20.0
}
fn default_sun_horizontal() -> f64 {
    60.0
}
fn default_vertical_drift() -> f64 {
    0.01
}
fn default_horizontal_drift() -> f64 {
    0.03
}
fn default_ambient() -> u16 {
    400
}
fn default_gain() -> f64 {
    15.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sun_vertical: default_sun_vertical(),
            sun_horizontal: default_sun_horizontal(),
            vertical_drift: default_vertical_drift(),
            horizontal_drift: default_horizontal_drift(),
            ambient: default_ambient(),
            gain: default_gain(),
            sensor_fail_every: 0,
            actuator_fail_every: 0,
            script: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("sun_vertical", self.sun_vertical),
            ("sun_horizontal", self.sun_horizontal),
            ("vertical_drift", self.vertical_drift),
            ("horizontal_drift", self.horizontal_drift),
            ("gain", self.gain),
        ] {
            if !value.is_finite() {
                return Err(format!("simulation.{name} must be finite, got {value}"));
            }
        }
        if self.gain < 0.0 {
            return Err(format!("simulation.gain must be >= 0, got {}", self.gain));
        }
        if self.ambient > SENSOR_MAX {
            return Err(format!(
                "simulation.ambient {} exceeds sensor range {SENSOR_MAX}",
                self.ambient
            ));
        }
        if let Some(i) = self.script.iter().position(|s| s.cycles == 0) {
            return Err(format!("simulation.script[{i}].cycles must be > 0"));
        }
        Ok(())
    }
}

/// One step of the remote mode script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStep {
    pub mode: ControlMode,
    /// Number of mode reads this step lasts.
    pub cycles: u64,
    /// Manual target for the vertical axis.
    #[serde(default)]
    pub vertical: Option<i32>,
    /// Manual target for the horizontal axis.
    #[serde(default)]
    pub horizontal: Option<i32>,
}

// ─── World ──────────────────────────────────────────────────────────

/// Number of accepted commands kept in [`SimWorld::recent`].
pub const RECENT_COMMANDS: usize = 64;

/// Shared simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimWorld {
    /// Light source position [deg], indexed by `Axis::index`.
    pub sun: [f64; 2],
    /// Panel position as last accepted by the actuator [deg].
    pub panel: [i32; 2],
    pub sensor_reads: u64,
    pub actuator_writes: u64,
    /// Accepted commands since start.
    pub commands: u64,
    /// Last [`RECENT_COMMANDS`] accepted commands, oldest first.
    pub recent: VecDeque<(Axis, i32)>,
}

impl SimWorld {
    /// Pointing error along `axis` [deg], signed the way the estimator
    /// reports it.
    pub fn pointing_error(&self, axis: Axis) -> f64 {
        let i = axis.index();
        (self.sun[i] - f64::from(self.panel[i])) * f64::from(axis.direction())
    }
}

/// Handle to the shared world, plus the collaborators built on it.
#[derive(Debug, Clone)]
pub struct SimulatedRig {
    world: Rc<RefCell<SimWorld>>,
    config: SimulationConfig,
}

impl SimulatedRig {
    /// Create a rig with the panel at `initial` angles.
    pub fn new(config: SimulationConfig, initial: [i32; 2]) -> Self {
        let world = SimWorld {
            sun: [config.sun_vertical, config.sun_horizontal],
            panel: initial,
            sensor_reads: 0,
            actuator_writes: 0,
            commands: 0,
            recent: VecDeque::with_capacity(RECENT_COMMANDS),
        };
        Self {
            world: Rc::new(RefCell::new(world)),
            config,
        }
    }

    pub fn sensor(&self) -> SimulatedSensor {
        SimulatedSensor {
            world: Rc::clone(&self.world),
            ambient: f64::from(self.config.ambient),
            gain: self.config.gain,
            drift: [self.config.vertical_drift, self.config.horizontal_drift],
            fail_every: self.config.sensor_fail_every,
        }
    }

    pub fn actuator(&self) -> RecordingActuator {
        RecordingActuator {
            world: Rc::clone(&self.world),
            fail_every: self.config.actuator_fail_every,
        }
    }

    pub fn remote(&self) -> ScriptedRemote {
        ScriptedRemote::new(self.config.script.clone())
    }

    /// Snapshot of the world.
    pub fn snapshot(&self) -> SimWorld {
        self.world.borrow().clone()
    }
}

// ─── Sensor ─────────────────────────────────────────────────────────

/// Quadrant sensor looking at the simulated light source.
#[derive(Debug)]
pub struct SimulatedSensor {
    world: Rc<RefCell<SimWorld>>,
    ambient: f64,
    gain: f64,
    drift: [f64; 2],
    fail_every: u64,
}

impl SimulatedSensor {
    fn corner(&self, dv: f64, dh: f64, top: bool, left: bool) -> u16 {
        let sv = if top { 1.0 } else { -1.0 };
        let sh = if left { 1.0 } else { -1.0 };
        let raw = self.ambient + self.gain * (sv * dv + sh * dh);
        // Float-to-int `as` saturates; bounds make it exact.
        raw.round().clamp(0.0, f64::from(SENSOR_MAX)) as u16
    }
}

impl SensorReader for SimulatedSensor {
    fn read_quadrant(&mut self) -> Result<SensorSample, TrackerError> {
        let mut world = self.world.borrow_mut();
        world.sensor_reads += 1;
        for (sun, drift) in world.sun.iter_mut().zip(self.drift) {
            *sun += drift;
        }
        if self.fail_every > 0 && world.sensor_reads % self.fail_every == 0 {
            return Err(TrackerError::SensorUnavailable(format!(
                "simulated dropout on read {}",
                world.sensor_reads
            )));
        }

        let dv = world.pointing_error(Axis::Vertical);
        let dh = world.pointing_error(Axis::Horizontal);
        drop(world);

        let q = SensorQuadrant::new(
            self.corner(dv, dh, true, true),
            self.corner(dv, dh, true, false),
            self.corner(dv, dh, false, true),
            self.corner(dv, dh, false, false),
        );
        trace!(?q, dv, dh, "Simulated sensor read");
        Ok(q.into())
    }
}

// ─── Actuator ───────────────────────────────────────────────────────

/// Actuator that moves the simulated panel instantly and records commands.
#[derive(Debug)]
pub struct RecordingActuator {
    world: Rc<RefCell<SimWorld>>,
    fail_every: u64,
}

impl ActuatorSink for RecordingActuator {
    fn set_angle(&mut self, axis: Axis, degrees: i32) -> Result<(), TrackerError> {
        let mut world = self.world.borrow_mut();
        world.actuator_writes += 1;
        if self.fail_every > 0 && world.actuator_writes % self.fail_every == 0 {
            return Err(TrackerError::ActuatorUnreachable {
                axis,
                reason: format!("simulated fault on write {}", world.actuator_writes),
            });
        }
        world.panel[axis.index()] = degrees;
        world.commands += 1;
        if world.recent.len() == RECENT_COMMANDS {
            world.recent.pop_front();
        }
        world.recent.push_back((axis, degrees));
        Ok(())
    }
}

// ─── Remote Source ──────────────────────────────────────────────────

/// Remote source replaying a fixed mode script.
///
/// Each `get_mode` call consumes one cycle of the current step. After the
/// last step the final mode is held.
#[derive(Debug, Clone)]
pub struct ScriptedRemote {
    steps: Vec<RemoteStep>,
    step: usize,
    /// Mode reads left in the current step.
    remaining: u64,
}

impl ScriptedRemote {
    pub fn new(steps: Vec<RemoteStep>) -> Self {
        let remaining = steps.first().map_or(0, |s| s.cycles);
        Self {
            steps,
            step: 0,
            remaining,
        }
    }

    fn current(&self) -> Option<&RemoteStep> {
        self.steps.get(self.step).or_else(|| self.steps.last())
    }
}

impl RemoteSource for ScriptedRemote {
    fn get_mode(&mut self) -> Result<ControlMode, TrackerError> {
        if self.remaining == 0 && self.step + 1 < self.steps.len() {
            self.step += 1;
            self.remaining = self.steps[self.step].cycles;
        }
        self.remaining = self.remaining.saturating_sub(1);
        Ok(self.current().map_or(ControlMode::Automatic, |s| s.mode))
    }

    fn get_manual_angle(&mut self, axis: Axis) -> Result<Option<i32>, TrackerError> {
        Ok(self.current().and_then(|s| match axis {
            Axis::Vertical => s.vertical,
            Axis::Horizontal => s.horizontal,
        }))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
