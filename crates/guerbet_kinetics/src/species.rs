//! Chemical species and the concentration state being evolved

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Feed concentration of ethanol in a fresh charge (mol/L)
pub const DEFAULT_INITIAL_CONCENTRATION: f64 = 1.0;

/// Broad chemical family of a species
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeciesClass {
    /// Saturated alcohol (R-CH2OH)
    Alcohol,
    /// Saturated aldehyde (R-CHO)
    Aldehyde,
    /// Alpha,beta-unsaturated aldehyde from aldol condensation
    Enal,
}

/// A tracked chemical species
///
/// The set is closed: species are never added or removed at runtime.
/// Serialized names match the conventional identifiers (`C2_OH`, `C4_Enal`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Ethanol
    #[serde(rename = "C2_OH")]
    C2Oh,
    /// n-Butanol
    #[serde(rename = "C4_OH")]
    C4Oh,
    /// n-Hexanol
    #[serde(rename = "C6_OH")]
    C6Oh,
    /// Acetaldehyde
    #[serde(rename = "C2_CHO")]
    C2Cho,
    /// Butanal
    #[serde(rename = "C4_CHO")]
    C4Cho,
    /// Hexanal
    #[serde(rename = "C6_CHO")]
    C6Cho,
    /// Crotonaldehyde (but-2-enal)
    #[serde(rename = "C4_Enal")]
    C4Enal,
    /// Hexa-2-enal
    #[serde(rename = "C6_Enal")]
    C6Enal,
}

impl Species {
    /// Number of species in the network
    pub const COUNT: usize = 8;

    /// All species in state order
    pub const ALL: [Species; Species::COUNT] = [
        Species::C2Oh,
        Species::C4Oh,
        Species::C6Oh,
        Species::C2Cho,
        Species::C4Cho,
        Species::C6Cho,
        Species::C4Enal,
        Species::C6Enal,
    ];

    /// Position of this species in [`Species::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Conventional identifier
    pub const fn name(self) -> &'static str {
        match self {
            Species::C2Oh => "C2_OH",
            Species::C4Oh => "C4_OH",
            Species::C6Oh => "C6_OH",
            Species::C2Cho => "C2_CHO",
            Species::C4Cho => "C4_CHO",
            Species::C6Cho => "C6_CHO",
            Species::C4Enal => "C4_Enal",
            Species::C6Enal => "C6_Enal",
        }
    }

    /// Number of carbon atoms in the chain
    pub const fn carbon_number(self) -> u32 {
        match self {
            Species::C2Oh | Species::C2Cho => 2,
            Species::C4Oh | Species::C4Cho | Species::C4Enal => 4,
            Species::C6Oh | Species::C6Cho | Species::C6Enal => 6,
        }
    }

    /// Chemical family
    pub const fn class(self) -> SpeciesClass {
        match self {
            Species::C2Oh | Species::C4Oh | Species::C6Oh => SpeciesClass::Alcohol,
            Species::C2Cho | Species::C4Cho | Species::C6Cho => SpeciesClass::Aldehyde,
            Species::C4Enal | Species::C6Enal => SpeciesClass::Enal,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concentration of every species (mol/L)
///
/// Concentrations are never negative: the integrator floors every updated
/// value at zero. Total mass is *not* conserved exactly: flooring an
/// overshoot at zero adds back whatever the step took below zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesState {
    concentrations: [f64; Species::COUNT],
}

impl SpeciesState {
    /// State with every concentration at zero
    pub const EMPTY: Self = Self {
        concentrations: [0.0; Species::COUNT],
    };

    /// Pure ethanol charge at [`DEFAULT_INITIAL_CONCENTRATION`]
    pub fn initial() -> Self {
        Self::with_feed(DEFAULT_INITIAL_CONCENTRATION)
    }

    /// Pure ethanol charge at the given concentration
    ///
    /// Negative or non-finite feeds are treated as zero.
    pub fn with_feed(concentration: f64) -> Self {
        let mut state = Self::EMPTY;
        state.set(Species::C2Oh, concentration);
        state
    }

    /// Concentration of a species
    pub fn get(&self, species: Species) -> f64 {
        self.concentrations[species.index()]
    }

    /// Set a concentration, flooring it at zero
    pub fn set(&mut self, species: Species, concentration: f64) {
        self.concentrations[species.index()] = if concentration.is_finite() {
            concentration.max(0.0)
        } else {
            0.0
        };
    }

    /// Iterate over `(species, concentration)` pairs in state order
    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        Species::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Sum of all concentrations
    pub fn total(&self) -> f64 {
        self.concentrations.iter().sum()
    }

    /// Carbon content in C2-equivalents
    ///
    /// Every reaction in the network conserves carbon, so only the clamp
    /// can change this value.
    pub fn carbon_balance(&self) -> f64 {
        self.iter()
            .map(|(s, c)| c * s.carbon_number() as f64 / 2.0)
            .sum()
    }

    /// Sum of concentrations over one chemical family
    pub fn class_total(&self, class: SpeciesClass) -> f64 {
        self.iter()
            .filter(|(s, _)| s.class() == class)
            .map(|(_, c)| c)
            .sum()
    }
}

impl Default for SpeciesState {
    fn default() -> Self {
        Self::initial()
    }
}

impl Index<Species> for SpeciesState {
    type Output = f64;

    fn index(&self, species: Species) -> &f64 {
        &self.concentrations[species.index()]
    }
}
