//! Control surface: where rate constants come from each tick

use guerbet_kinetics::RateConstants;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Supplies the rate constants for the next tick
///
/// The session asks once per tick with the simulated time at the start of
/// that tick. Implementations may return different constants every time;
/// whatever they return is clamped to non-negative values before use.
pub trait ControlSurface {
    /// Constants to use for the tick starting at `sim_time`
    fn rate_constants(&self, sim_time: f64) -> RateConstants;
}

/// Fixed sliders
impl ControlSurface for RateConstants {
    fn rate_constants(&self, _sim_time: f64) -> RateConstants {
        self.sanitized()
    }
}

/// Sliders the host can move between ticks
impl ControlSurface for Cell<RateConstants> {
    fn rate_constants(&self, _sim_time: f64) -> RateConstants {
        self.get().sanitized()
    }
}

impl<T: ControlSurface + ?Sized> ControlSurface for &T {
    fn rate_constants(&self, sim_time: f64) -> RateConstants {
        (**self).rate_constants(sim_time)
    }
}

/// A change of rate constants at a point in simulated time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateChange {
    /// Simulated time from which the new constants apply
    pub at: f64,
    /// Constants in effect from `at` onwards
    pub rates: RateConstants,
}

/// Piecewise-constant rate constants over simulated time
#[derive(Clone, Debug, PartialEq)]
pub struct RateSchedule {
    base: RateConstants,
    /// Sorted by `at`
    changes: Vec<RateChange>,
}

impl RateSchedule {
    /// Schedule that always returns `base`
    pub fn new(base: RateConstants) -> Self {
        Self {
            base: base.sanitized(),
            changes: Vec::new(),
        }
    }

    /// Add a change, keeping the schedule ordered by time
    ///
    /// A change at the same time as an existing one replaces it.
    pub fn with_change(mut self, at: f64, rates: RateConstants) -> Self {
        self.insert(RateChange { at, rates });
        self
    }

    /// Add a change in place
    pub fn insert(&mut self, change: RateChange) {
        let change = RateChange {
            at: change.at,
            rates: change.rates.sanitized(),
        };
        match self.changes.binary_search_by(|c| c.at.total_cmp(&change.at)) {
            Ok(i) => self.changes[i] = change,
            Err(i) => self.changes.insert(i, change),
        }
    }

    /// Constants in effect before the first change
    pub fn base(&self) -> RateConstants {
        self.base
    }

    /// Scheduled changes in time order
    pub fn changes(&self) -> &[RateChange] {
        &self.changes
    }
}

impl ControlSurface for RateSchedule {
    fn rate_constants(&self, sim_time: f64) -> RateConstants {
        self.changes
            .iter()
            .rev()
            .find(|c| c.at <= sim_time)
            .map(|c| c.rates)
            .unwrap_or(self.base)
            .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constants() {
        let k = RateConstants::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(k.rate_constants(0.0), k);
        assert_eq!(k.rate_constants(150.0), k);
    }

    #[test]
    fn test_fixed_constants_are_sanitized() {
        let k = RateConstants { k1: -1.0, k2: 0.2, k3: 0.3, k4: 0.4 };
        assert_eq!(k.rate_constants(0.0).k1, 0.0);
    }

    #[test]
    fn test_cell_reads_latest_value() {
        let sliders = Cell::new(RateConstants::ZERO);
        assert_eq!(sliders.rate_constants(0.0), RateConstants::ZERO);

        sliders.set(RateConstants::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(sliders.rate_constants(0.05).k1, 1.0);
    }

    #[test]
    fn test_schedule_lookup() {
        let base = RateConstants::new(0.1, 0.0, 0.0, 0.0);
        let later = RateConstants::new(0.1, 0.5, 0.0, 0.0);
        let last = RateConstants::new(0.0, 0.5, 0.3, 0.3);
        let schedule = RateSchedule::new(base)
            .with_change(100.0, last)
            .with_change(50.0, later);

        assert_eq!(schedule.rate_constants(0.0), base);
        assert_eq!(schedule.rate_constants(49.95), base);
        assert_eq!(schedule.rate_constants(50.0), later);
        assert_eq!(schedule.rate_constants(99.0), later);
        assert_eq!(schedule.rate_constants(180.0), last);
    }

    #[test]
    fn test_schedule_keeps_changes_sorted() {
        let schedule = RateSchedule::new(RateConstants::ZERO)
            .with_change(30.0, RateConstants::ZERO)
            .with_change(10.0, RateConstants::ZERO)
            .with_change(20.0, RateConstants::ZERO);
        let times: Vec<f64> = schedule.changes().iter().map(|c| c.at).collect();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_schedule_replaces_same_time() {
        let schedule = RateSchedule::new(RateConstants::ZERO)
            .with_change(10.0, RateConstants::new(1.0, 0.0, 0.0, 0.0))
            .with_change(10.0, RateConstants::new(2.0, 0.0, 0.0, 0.0));
        assert_eq!(schedule.changes().len(), 1);
        assert_eq!(schedule.rate_constants(10.0).k1, 2.0);
    }
}
