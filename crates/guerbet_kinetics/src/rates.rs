//! Rate constants and rate-law evaluation

use crate::species::{Species, SpeciesState};
use serde::{Deserialize, Serialize};

/// Which of the four rate constants drives a reaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateConstant {
    /// k1: alcohol dehydrogenation
    Dehydrogenation,
    /// k2: aldol condensation
    Aldol,
    /// k3: C=C hydrogenation of enals
    OlefinHydrogenation,
    /// k4: C=O hydrogenation of aldehydes
    CarbonylHydrogenation,
}

/// The four user-tunable rate constants
///
/// Values are non-negative and finite; [`RateConstants::new`] enforces this.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateConstants {
    /// Dehydrogenation (alcohol -> aldehyde)
    pub k1: f64,
    /// Aldol condensation (aldehyde + aldehyde -> enal)
    pub k2: f64,
    /// C=C hydrogenation (enal -> saturated aldehyde)
    pub k3: f64,
    /// C=O hydrogenation (aldehyde -> alcohol)
    pub k4: f64,
}

impl Default for RateConstants {
    fn default() -> Self {
        Self {
            k1: 0.1,
            k2: 0.5,
            k3: 0.2,
            k4: 0.1,
        }
    }
}

impl RateConstants {
    /// All reactions switched off
    pub const ZERO: Self = Self {
        k1: 0.0,
        k2: 0.0,
        k3: 0.0,
        k4: 0.0,
    };

    /// Create rate constants, clamping negative or non-finite values to zero
    pub fn new(k1: f64, k2: f64, k3: f64, k4: f64) -> Self {
        Self {
            k1: non_negative(k1),
            k2: non_negative(k2),
            k3: non_negative(k3),
            k4: non_negative(k4),
        }
    }

    /// Re-apply the clamp, e.g. after deserializing
    pub fn sanitized(self) -> Self {
        Self::new(self.k1, self.k2, self.k3, self.k4)
    }

    /// Value of one constant
    pub fn get(&self, constant: RateConstant) -> f64 {
        match constant {
            RateConstant::Dehydrogenation => self.k1,
            RateConstant::Aldol => self.k2,
            RateConstant::OlefinHydrogenation => self.k3,
            RateConstant::CarbonylHydrogenation => self.k4,
        }
    }

    /// Evaluate every rate law against the given state
    pub fn evaluate(&self, state: &SpeciesState) -> ReactionRates {
        ReactionRates::evaluate(state, self)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// An elementary step of the network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// C2_OH -> C2_CHO
    DehydroC2,
    /// C4_OH -> C4_CHO
    DehydroC4,
    /// 2 C2_CHO -> C4_Enal
    AldolC2C2,
    /// C2_CHO + C4_CHO -> C6_Enal
    AldolC2C4,
    /// C4_Enal -> C4_CHO
    HydroOlefinC4,
    /// C6_Enal -> C6_CHO
    HydroOlefinC6,
    /// C2_CHO -> C2_OH
    HydroCarbonylC2,
    /// C4_CHO -> C4_OH
    HydroCarbonylC4,
    /// C6_CHO -> C6_OH
    HydroCarbonylC6,
}

impl Reaction {
    /// Every reaction, in evaluation order
    pub const ALL: [Reaction; 9] = [
        Reaction::DehydroC2,
        Reaction::DehydroC4,
        Reaction::AldolC2C2,
        Reaction::AldolC2C4,
        Reaction::HydroOlefinC4,
        Reaction::HydroOlefinC6,
        Reaction::HydroCarbonylC2,
        Reaction::HydroCarbonylC4,
        Reaction::HydroCarbonylC6,
    ];

    /// Rate constant multiplying this reaction's rate law
    pub const fn constant(self) -> RateConstant {
        match self {
            Reaction::DehydroC2 | Reaction::DehydroC4 => RateConstant::Dehydrogenation,
            Reaction::AldolC2C2 | Reaction::AldolC2C4 => RateConstant::Aldol,
            Reaction::HydroOlefinC4 | Reaction::HydroOlefinC6 => RateConstant::OlefinHydrogenation,
            Reaction::HydroCarbonylC2 | Reaction::HydroCarbonylC4 | Reaction::HydroCarbonylC6 => {
                RateConstant::CarbonylHydrogenation
            }
        }
    }

    /// Short identifier used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Reaction::DehydroC2 => "dehydro_C2",
            Reaction::DehydroC4 => "dehydro_C4",
            Reaction::AldolC2C2 => "aldol_C2_C2",
            Reaction::AldolC2C4 => "aldol_C2_C4",
            Reaction::HydroOlefinC4 => "hydro_olefin_C4",
            Reaction::HydroOlefinC6 => "hydro_olefin_C6",
            Reaction::HydroCarbonylC2 => "hydro_carbonyl_C2",
            Reaction::HydroCarbonylC4 => "hydro_carbonyl_C4",
            Reaction::HydroCarbonylC6 => "hydro_carbonyl_C6",
        }
    }
}

/// Instantaneous rate of every reaction (mol/L/s)
///
/// All rates are non-negative: they are products of non-negative
/// concentrations and non-negative constants.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReactionRates {
    pub dehydro_c2: f64,
    pub dehydro_c4: f64,
    pub aldol_c2_c2: f64,
    pub aldol_c2_c4: f64,
    pub hydro_olefin_c4: f64,
    pub hydro_olefin_c6: f64,
    pub hydro_carbonyl_c2: f64,
    pub hydro_carbonyl_c4: f64,
    pub hydro_carbonyl_c6: f64,
}

impl ReactionRates {
    /// Evaluate the rate laws
    ///
    /// First order in the reactant for every step except the aldol
    /// condensations, which are second order (self- and cross-condensation).
    pub fn evaluate(state: &SpeciesState, k: &RateConstants) -> Self {
        let c2_cho = state[Species::C2Cho];
        let c4_cho = state[Species::C4Cho];

        Self {
            dehydro_c2: k.k1 * state[Species::C2Oh],
            dehydro_c4: k.k1 * state[Species::C4Oh],
            aldol_c2_c2: k.k2 * c2_cho * c2_cho,
            aldol_c2_c4: k.k2 * c2_cho * c4_cho,
            hydro_olefin_c4: k.k3 * state[Species::C4Enal],
            hydro_olefin_c6: k.k3 * state[Species::C6Enal],
            hydro_carbonyl_c2: k.k4 * c2_cho,
            hydro_carbonyl_c4: k.k4 * c4_cho,
            hydro_carbonyl_c6: k.k4 * state[Species::C6Cho],
        }
    }

    /// Rate of one reaction
    pub fn get(&self, reaction: Reaction) -> f64 {
        match reaction {
            Reaction::DehydroC2 => self.dehydro_c2,
            Reaction::DehydroC4 => self.dehydro_c4,
            Reaction::AldolC2C2 => self.aldol_c2_c2,
            Reaction::AldolC2C4 => self.aldol_c2_c4,
            Reaction::HydroOlefinC4 => self.hydro_olefin_c4,
            Reaction::HydroOlefinC6 => self.hydro_olefin_c6,
            Reaction::HydroCarbonylC2 => self.hydro_carbonyl_c2,
            Reaction::HydroCarbonylC4 => self.hydro_carbonyl_c4,
            Reaction::HydroCarbonylC6 => self.hydro_carbonyl_c6,
        }
    }

    /// Iterate over `(reaction, rate)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Reaction, f64)> + '_ {
        Reaction::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_state() -> SpeciesState {
        let mut state = SpeciesState::EMPTY;
        state.set(Species::C2Oh, 0.6);
        state.set(Species::C4Oh, 0.1);
        state.set(Species::C2Cho, 0.2);
        state.set(Species::C4Cho, 0.05);
        state.set(Species::C6Cho, 0.02);
        state.set(Species::C4Enal, 0.03);
        state.set(Species::C6Enal, 0.01);
        state
    }

    #[test]
    fn test_new_clamps_values() {
        let k = RateConstants::new(-1.0, f64::NAN, f64::INFINITY, 0.3);
        assert_eq!(k.k1, 0.0);
        assert_eq!(k.k2, 0.0);
        assert_eq!(k.k3, 0.0);
        assert_eq!(k.k4, 0.3);
    }

    #[test]
    fn test_sanitized() {
        let k = RateConstants { k1: -0.5, k2: 1.0, k3: 0.0, k4: 2.0 }.sanitized();
        assert_eq!(k, RateConstants::new(0.0, 1.0, 0.0, 2.0));
    }

    #[test]
    fn test_rate_laws() {
        let k = RateConstants::new(1.0, 2.0, 3.0, 4.0);
        let rates = k.evaluate(&mixed_state());

        assert!((rates.dehydro_c2 - 0.6).abs() < 1e-12);
        assert!((rates.dehydro_c4 - 0.1).abs() < 1e-12);
        // Second order: 2 * 0.2^2 and 2 * 0.2 * 0.05
        assert!((rates.aldol_c2_c2 - 0.08).abs() < 1e-12);
        assert!((rates.aldol_c2_c4 - 0.02).abs() < 1e-12);
        assert!((rates.hydro_olefin_c4 - 0.09).abs() < 1e-12);
        assert!((rates.hydro_olefin_c6 - 0.03).abs() < 1e-12);
        assert!((rates.hydro_carbonyl_c2 - 0.8).abs() < 1e-12);
        assert!((rates.hydro_carbonyl_c4 - 0.2).abs() < 1e-12);
        assert!((rates.hydro_carbonyl_c6 - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_zero_constants_give_zero_rates() {
        let rates = RateConstants::ZERO.evaluate(&mixed_state());
        assert!(rates.iter().all(|(_, r)| r == 0.0));
    }

    #[test]
    fn test_rates_are_non_negative() {
        let rates = RateConstants::new(0.7, 1.3, 0.4, 0.9).evaluate(&mixed_state());
        for (reaction, rate) in rates.iter() {
            assert!(rate >= 0.0, "{} negative", reaction.name());
        }
    }

    #[test]
    fn test_reaction_constant_mapping() {
        let k = RateConstants::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(k.get(Reaction::DehydroC4.constant()), 1.0);
        assert_eq!(k.get(Reaction::AldolC2C4.constant()), 2.0);
        assert_eq!(k.get(Reaction::HydroOlefinC6.constant()), 3.0);
        assert_eq!(k.get(Reaction::HydroCarbonylC2.constant()), 4.0);
    }

    #[test]
    fn test_get_matches_fields() {
        let rates = RateConstants::new(1.0, 2.0, 3.0, 4.0).evaluate(&mixed_state());
        assert_eq!(rates.get(Reaction::AldolC2C2), rates.aldol_c2_c2);
        assert_eq!(rates.get(Reaction::HydroCarbonylC6), rates.hydro_carbonyl_c6);
        assert_eq!(rates.iter().count(), Reaction::ALL.len());
    }
}
