//! Particle census for the molecule animation

use guerbet_kinetics::{Species, SpeciesState};

/// Molecules drawn by the particle renderer
pub const DEFAULT_MOLECULE_COUNT: u32 = 200;

/// Category a drawn molecule belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleCategory {
    /// Ethanol
    C2Alcohol,
    /// Butanol
    C4Alcohol,
    /// Hexanol
    C6Alcohol,
    /// Everything that is not one of the three alcohols
    Intermediate,
}

impl ParticleCategory {
    /// All categories in drawing order
    pub const ALL: [ParticleCategory; 4] = [
        ParticleCategory::C2Alcohol,
        ParticleCategory::C4Alcohol,
        ParticleCategory::C6Alcohol,
        ParticleCategory::Intermediate,
    ];
}

/// How many molecules of each category to draw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleCensus {
    pub c2: u32,
    pub c4: u32,
    pub c6: u32,
    pub intermediate: u32,
}

impl ParticleCensus {
    /// Derive counts from a state for a fixed molecule budget
    ///
    /// Each alcohol gets `round(budget * concentration)` molecules and the
    /// remainder is drawn as intermediates. If rounding overshoots the
    /// budget, intermediates bottom out at zero.
    pub fn from_state(state: &SpeciesState, budget: u32) -> Self {
        let count = |species: Species| -> u32 {
            let n = (budget as f64 * state[species]).round();
            n.min(budget as f64) as u32
        };

        let c2 = count(Species::C2Oh);
        let c4 = count(Species::C4Oh);
        let c6 = count(Species::C6Oh);
        let intermediate = budget.saturating_sub(c2.saturating_add(c4).saturating_add(c6));

        Self { c2, c4, c6, intermediate }
    }

    /// Count for one category
    pub fn get(&self, category: ParticleCategory) -> u32 {
        match category {
            ParticleCategory::C2Alcohol => self.c2,
            ParticleCategory::C4Alcohol => self.c4,
            ParticleCategory::C6Alcohol => self.c6,
            ParticleCategory::Intermediate => self.intermediate,
        }
    }

    /// Total molecules
    pub fn total(&self) -> u32 {
        self.c2 + self.c4 + self.c6 + self.intermediate
    }
}
