//! Reaction kinetics for the Guerbet network
//!
//! This crate provides the numerical core of the simulation:
//! - [`Species`] and [`SpeciesState`] - the eight tracked species and their concentrations
//! - [`RateConstants`] and [`ReactionRates`] - rate laws driven by k1..k4
//! - [`advance`] / [`advance_in_place`] - one explicit Euler step, clamped at zero
//!
//! Nothing here knows about clocks, scheduling or rendering.

pub mod integrator;
pub mod rates;
pub mod species;

// Re-export commonly used types
pub use integrator::{advance, advance_in_place, stoichiometric_delta, SpeciesDelta, StepReport};
pub use rates::{RateConstant, RateConstants, Reaction, ReactionRates};
pub use species::{Species, SpeciesClass, SpeciesState, DEFAULT_INITIAL_CONCENTRATION};
