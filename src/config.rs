//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`GUERBET_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use guerbet_core::{RateConstants, SessionConfig, SessionError, Species};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Integration and display configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Initial slider positions
    #[serde(default)]
    pub rates: RatesConfig,
    /// Frame pacing
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Optional scenario file
    #[serde(default)]
    pub scenario: ScenarioConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            rates: RatesConfig::default(),
            scheduler: SchedulerConfig::default(),
            scenario: ScenarioConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`GUERBET_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // GUERBET_RATES__K2=0.8 -> rates.k2 = 0.8
        figment = figment.merge(Env::prefixed("GUERBET_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Build the validated session configuration
    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        let config = self.simulation.to_session_config();
        config.validate()?;
        Ok(config)
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed integration step (simulated seconds)
    pub time_step: f64,
    /// Simulated time at which a run completes
    pub max_time: f64,
    /// Ethanol concentration of a fresh charge (mol/L)
    pub initial_concentration: f64,
    /// Molecules drawn by the particle renderer
    pub molecule_count: u32,
    /// Two species shown on the textual display
    pub tracked_species: [Species; 2],
    /// Species plotted on the chart
    pub chart_species: Vec<Species>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            time_step: session.time_step,
            max_time: session.max_time,
            initial_concentration: session.initial_concentration,
            molecule_count: session.molecule_count,
            tracked_species: session.tracked_species,
            chart_species: session.chart_species,
        }
    }
}

impl SimulationConfig {
    /// Convert to the core session configuration (not yet validated)
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            time_step: self.time_step,
            max_time: self.max_time,
            initial_concentration: self.initial_concentration,
            molecule_count: self.molecule_count,
            tracked_species: self.tracked_species,
            chart_species: self.chart_species.clone(),
        }
    }
}

/// Rate constant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Dehydrogenation
    pub k1: f64,
    /// Aldol condensation
    pub k2: f64,
    /// C=C hydrogenation
    pub k3: f64,
    /// C=O hydrogenation
    pub k4: f64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        let k = RateConstants::default();
        Self {
            k1: k.k1,
            k2: k.k2,
            k3: k.k3,
            k4: k.k4,
        }
    }
}

impl RatesConfig {
    /// Convert to rate constants, clamping negatives to zero
    pub fn to_rate_constants(&self) -> RateConstants {
        RateConstants::new(self.k1, self.k2, self.k3, self.k4)
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Ticks per wall-clock second (0 = as fast as possible)
    pub frame_rate: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { frame_rate: 60.0 }
    }
}

/// Scenario configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// RON scenario file; when set it replaces `[rates]`
    #[serde(default)]
    pub path: Option<String>,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl From<SessionError> for ConfigError {
    fn from(e: SessionError) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
