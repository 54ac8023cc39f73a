//! Core types for running a Guerbet kinetics simulation
//!
//! This crate wraps the numerical step from `guerbet_kinetics` in a session:
//!
//! - [`SimulationClock`] - Fixed-step clock with an explicit chart sampling counter
//! - [`SimulationSession`] - Owns the state and drives `start`/`tick`/`reset`/`cancel`
//! - [`ControlSurface`] - Source of rate constants, read once per tick
//! - [`SimulationObserver`] - Display, chart and particle collaborators
//! - [`ParticleCensus`] - Molecule counts per category for the particle renderer
//! - [`SeriesRecorder`] - In-memory chart history
//! - [`Scenario`] - Loadable/saveable rate-constant preset

mod census;
mod clock;
mod control;
mod history;
mod observer;
mod scenario;
mod session;

pub use census::{ParticleCategory, ParticleCensus, DEFAULT_MOLECULE_COUNT};
pub use clock::SimulationClock;
pub use control::{ControlSurface, RateChange, RateSchedule};
pub use history::SeriesRecorder;
pub use observer::{ChartSample, DisplayUpdate, Notifications, ObserverKey, ObserverRegistry, SimulationObserver};
pub use scenario::{Scenario, ScenarioLoadError, ScenarioSaveError};
pub use session::{RunState, SessionConfig, SessionError, SimulationSession, TickOutcome};

// Re-export kinetics types for convenient access through guerbet_core
pub use guerbet_kinetics::{RateConstants, ReactionRates, Species, SpeciesClass, SpeciesState};
