//! Stoichiometry and the explicit Euler step
//!
//! One step is:
//! 1. Evaluate every rate law against the current state
//! 2. Combine rates into a per-species rate of change
//! 3. `new = max(0, old + delta * dt)` for each species independently
//!
//! This is plain forward Euler with a fixed step. If `k * dt` is large the
//! scheme overshoots and oscillates before the clamp hides it; callers pick
//! a small enough step.

use crate::rates::{RateConstants, ReactionRates};
use crate::species::{Species, SpeciesState};
use std::ops::Index;

/// Net rate of change of every species (mol/L/s), before scaling by dt
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpeciesDelta {
    deltas: [f64; Species::COUNT],
}

impl SpeciesDelta {
    /// Rate of change of a species
    pub fn get(&self, species: Species) -> f64 {
        self.deltas[species.index()]
    }

    /// Iterate over `(species, rate of change)` pairs in state order
    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        Species::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

impl Index<Species> for SpeciesDelta {
    type Output = f64;

    fn index(&self, species: Species) -> &f64 {
        &self.deltas[species.index()]
    }
}

/// Combine reaction rates into per-species deltas
///
/// Consumption is negative, production positive. Self-condensation
/// consumes two C2 aldehydes per event.
pub fn stoichiometric_delta(r: &ReactionRates) -> SpeciesDelta {
    let mut deltas = [0.0; Species::COUNT];

    deltas[Species::C2Oh.index()] = -r.dehydro_c2 + r.hydro_carbonyl_c2;
    deltas[Species::C4Oh.index()] = -r.dehydro_c4 + r.hydro_carbonyl_c4;
    deltas[Species::C6Oh.index()] = r.hydro_carbonyl_c6;

    deltas[Species::C2Cho.index()] =
        r.dehydro_c2 - r.hydro_carbonyl_c2 - 2.0 * r.aldol_c2_c2 - r.aldol_c2_c4;
    deltas[Species::C4Cho.index()] =
        r.dehydro_c4 + r.hydro_olefin_c4 - r.hydro_carbonyl_c4 - r.aldol_c2_c4;
    deltas[Species::C6Cho.index()] = r.hydro_olefin_c6 - r.hydro_carbonyl_c6;

    deltas[Species::C4Enal.index()] = r.aldol_c2_c2 - r.hydro_olefin_c4;
    deltas[Species::C6Enal.index()] = r.aldol_c2_c4 - r.hydro_olefin_c6;

    SpeciesDelta { deltas }
}

/// What happened during one step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Rates evaluated at the start of the step
    pub rates: ReactionRates,
    /// Concentration added back by flooring overshoot at zero
    pub clamped: f64,
}

/// Advance the state by one explicit Euler step, returning the new state
pub fn advance(state: &SpeciesState, constants: &RateConstants, dt: f64) -> SpeciesState {
    let mut next = *state;
    advance_in_place(&mut next, constants, dt);
    next
}

/// Advance the state in place by one explicit Euler step
///
/// Each species is updated and clamped independently; nothing is
/// renormalized afterwards.
pub fn advance_in_place(state: &mut SpeciesState, constants: &RateConstants, dt: f64) -> StepReport {
    let rates = ReactionRates::evaluate(state, constants);
    let delta = stoichiometric_delta(&rates);

    let mut clamped = 0.0;
    for species in Species::ALL {
        let raw = state[species] + delta[species] * dt;
        if raw < 0.0 {
            clamped -= raw;
        }
        state.set(species, raw);
    }

    if clamped > 0.0 {
        log::trace!("Floored {:.3e} mol/L of overshoot at zero this step", clamped);
    }

    StepReport { rates, clamped }
}
