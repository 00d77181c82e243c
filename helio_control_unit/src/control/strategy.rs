//! Motion strategy selected at configuration time.

use helio_common::tracker::config::StrategyConfig;
use helio_common::tracker::state::Axis;

use super::pid::PidStepper;
use super::threshold::ThresholdStepper;

/// Motion controller for both axes.
#[derive(Debug, Clone, Copy)]
pub enum MotionController {
    Threshold(ThresholdStepper),
    Pid(PidStepper),
}

impl MotionController {
    pub fn from_config(config: &StrategyConfig) -> Self {
        match config {
            StrategyConfig::Threshold { tolerance } => {
                Self::Threshold(ThresholdStepper::new(*tolerance))
            }
            StrategyConfig::Pid(params) => Self::Pid(PidStepper::new(*params)),
        }
    }

    /// Unclamped candidate angle for `axis`.
    #[inline]
    pub fn candidate(&mut self, axis: Axis, error: i32, current_angle: i32) -> i32 {
        match self {
            Self::Threshold(s) => s.step(axis, error, current_angle),
            Self::Pid(s) => s.step(axis, error, current_angle),
        }
    }

    /// Clear accumulated state. No-op for the stateless threshold stepper.
    pub fn reset(&mut self) {
        if let Self::Pid(s) = self {
            s.reset();
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Threshold(_) => "threshold",
            Self::Pid(_) => "pid",
        }
    }
}

impl From<&StrategyConfig> for MotionController {
    fn from(config: &StrategyConfig) -> Self {
        Self::from_config(config)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
