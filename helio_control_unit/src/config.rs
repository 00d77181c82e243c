//! TOML configuration loader with validation.
//!
//! One file holds the `[shared]`, `[tracker]` and optional `[simulation]`
//! tables. Missing tables fall back to the reference rig defaults.

use std::path::Path;

use helio_common::config::{ConfigError, ConfigLoader, SharedConfig};
use helio_common::tracker::config::TrackerConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sim::SimulationConfig;

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Complete validated configuration bundle, ready for runtime use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Simulation rig parameters; defaults apply when absent.
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
}

impl LoadedConfig {
    /// Run all validation rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.tracker.validate()?;
        if let Some(sim) = &self.simulation {
            sim.validate().map_err(ConfigError::ValidationError)?;
        }
        Ok(())
    }

    /// Simulation parameters, or the defaults.
    pub fn simulation_or_default(&self) -> SimulationConfig {
        self.simulation.clone().unwrap_or_default()
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let config = LoadedConfig::load(path)?;
    config.validate()?;
    debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    let config = LoadedConfig::from_toml(content)?;
    config.validate()?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────
