//! Scenario serialization
//!
//! A scenario is a named preset of rate constants, optionally with changes
//! at later simulated times and its own step/horizon. Scenarios are stored
//! as RON files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use guerbet_kinetics::RateConstants;

use crate::control::{RateChange, RateSchedule};
use crate::session::SessionConfig;

/// A serializable rate-constant preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name (for display/logging)
    pub name: String,
    /// Constants at t = 0
    pub rates: RateConstants,
    /// Later changes, in any order
    #[serde(default)]
    pub schedule: Vec<RateChange>,
    /// Override for the integration step
    #[serde(default)]
    pub time_step: Option<f64>,
    /// Override for the time horizon
    #[serde(default)]
    pub max_time: Option<f64>,
}

impl Scenario {
    /// Create a scenario with constant rates
    pub fn new(name: impl Into<String>, rates: RateConstants) -> Self {
        Self {
            name: name.into(),
            rates,
            schedule: Vec::new(),
            time_step: None,
            max_time: None,
        }
    }

    /// Load a scenario from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioLoadError> {
        let contents = fs::read_to_string(path)?;
        let scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Save a scenario to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScenarioSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add a change of constants at a later time
    pub fn with_change(mut self, at: f64, rates: RateConstants) -> Self {
        self.schedule.push(RateChange { at, rates });
        self
    }

    /// Override the integration step
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = Some(time_step);
        self
    }

    /// Override the time horizon
    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Control surface replaying this scenario
    pub fn rate_schedule(&self) -> RateSchedule {
        let mut schedule = RateSchedule::new(self.rates);
        for change in &self.schedule {
            schedule.insert(*change);
        }
        schedule
    }

    /// Apply the step/horizon overrides to a base configuration
    pub fn apply_to(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(time_step) = self.time_step {
            config.time_step = time_step;
        }
        if let Some(max_time) = self.max_time {
            config.max_time = max_time;
        }
        config
    }
}

/// Error loading a scenario
#[derive(Debug)]
pub enum ScenarioLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for ScenarioLoadError {
    fn from(e: io::Error) -> Self {
        ScenarioLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ScenarioLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        ScenarioLoadError::Parse(e)
    }
}

impl std::fmt::Display for ScenarioLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioLoadError::Io(e) => write!(f, "IO error: {}", e),
            ScenarioLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ScenarioLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioLoadError::Io(e) => Some(e),
            ScenarioLoadError::Parse(e) => Some(e),
        }
    }
}

/// Error saving a scenario
#[derive(Debug)]
pub enum ScenarioSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for ScenarioSaveError {
    fn from(e: io::Error) -> Self {
        ScenarioSaveError::Io(e)
    }
}

impl From<ron::Error> for ScenarioSaveError {
    fn from(e: ron::Error) -> Self {
        ScenarioSaveError::Serialize(e)
    }
}

impl std::fmt::Display for ScenarioSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioSaveError::Io(e) => write!(f, "IO error: {}", e),
            ScenarioSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ScenarioSaveError {}
