//! Mode arbiter: Automatic ↔ Manual ↔ Stopped.
//!
//! The mode is read from the remote source once per cycle. Any transition is
//! allowed and takes effect immediately. A failed read keeps the previous
//! mode.

use helio_common::tracker::error::TrackerError;
use helio_common::tracker::state::ControlMode;
use tracing::{debug, info};

/// Result of feeding one mode read into the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeUpdate {
    /// Mode unchanged.
    Unchanged(ControlMode),
    /// Mode switched this cycle.
    Changed {
        from: ControlMode,
        to: ControlMode,
    },
    /// Source unavailable; previous mode retained.
    Retained(ControlMode),
}

impl ModeUpdate {
    /// Mode in effect for this cycle.
    #[inline]
    pub const fn mode(&self) -> ControlMode {
        match *self {
            Self::Unchanged(m) | Self::Retained(m) => m,
            Self::Changed { to, .. } => to,
        }
    }

    #[inline]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Holds the current control mode.
#[derive(Debug, Clone)]
pub struct ModeArbiter {
    mode: ControlMode,
    transitions: u64,
}

impl ModeArbiter {
    pub const fn new(initial: ControlMode) -> Self {
        Self {
            mode: initial,
            transitions: 0,
        }
    }

    /// Current mode.
    #[inline]
    pub const fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Number of transitions since start.
    #[inline]
    pub const fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Apply the result of a remote mode read.
    pub fn update(&mut self, read: Result<ControlMode, TrackerError>) -> ModeUpdate {
        let next = match read {
            Ok(next) => next,
            Err(e) => {
                debug!(mode = %self.mode, error = %e, "Mode source unavailable, keeping mode");
                return ModeUpdate::Retained(self.mode);
            }
        };

        if next == self.mode {
            return ModeUpdate::Unchanged(next);
        }

        let from = self.mode;
        self.mode = next;
        self.transitions += 1;
        info!(%from, to = %next, "Mode transition");
        ModeUpdate::Changed { from, to: next }
    }
}

impl Default for ModeArbiter {
    fn default() -> Self {
        Self::new(ControlMode::default())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
