//! Collaborators notified by the simulation session
//!
//! The session pushes three kinds of updates after each tick:
//! - a display update (time plus two tracked concentrations)
//! - a chart sample, once per unit of simulated time
//! - the full state and particle census for the particle renderer
//!
//! Observers are stored in a [`SlotMap`] so the host can detach one by key
//! without disturbing the others.

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use guerbet_kinetics::{Species, SpeciesState};
use slotmap::{new_key_type, SlotMap};

use crate::census::ParticleCensus;
use crate::session::RunState;

new_key_type! {
    /// Key to a registered observer
    pub struct ObserverKey;
}

bitflags! {
    /// Which notifications were sent during a tick
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Notifications: u8 {
        /// Display update
        const DISPLAY = 1 << 0;
        /// Chart sample
        const CHART = 1 << 1;
        /// Particle renderer update
        const PARTICLES = 1 << 2;
    }
}

/// Values for the textual display
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayUpdate {
    /// Simulated time
    pub sim_time: f64,
    /// The two tracked species and their concentrations
    pub tracked: [(Species, f64); 2],
}

/// One point of the time-series chart
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSample {
    /// Time label, one decimal
    pub label: String,
    /// Simulated time of the sample
    pub sim_time: f64,
    /// Concentration of each charted species
    pub values: Vec<(Species, f64)>,
}

impl ChartSample {
    /// Concentration of a charted species, if it is part of this sample
    pub fn value(&self, species: Species) -> Option<f64> {
        self.values
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, v)| *v)
    }
}

/// External collaborator of the session
///
/// Every method has an empty default so a collaborator only implements what
/// it consumes. Calls happen synchronously on the session's thread, after
/// the state for the tick has been fully updated.
pub trait SimulationObserver {
    /// New time and tracked concentrations
    fn on_display(&mut self, _update: &DisplayUpdate) {}

    /// New chart point
    fn on_chart_sample(&mut self, _sample: &ChartSample) {}

    /// Full state after a tick, read-only
    fn on_particles(&mut self, _state: &SpeciesState, _census: &ParticleCensus) {}

    /// Drop any accumulated history (chart series, particles)
    fn on_clear(&mut self) {}

    /// The run state changed; controls are locked while running
    fn on_run_state_changed(&mut self, _state: RunState, _controls_locked: bool) {}
}

/// Shared handle, so the host can keep reading an observer it registered
impl<T: SimulationObserver> SimulationObserver for Rc<RefCell<T>> {
    fn on_display(&mut self, update: &DisplayUpdate) {
        self.borrow_mut().on_display(update);
    }

    fn on_chart_sample(&mut self, sample: &ChartSample) {
        self.borrow_mut().on_chart_sample(sample);
    }

    fn on_particles(&mut self, state: &SpeciesState, census: &ParticleCensus) {
        self.borrow_mut().on_particles(state, census);
    }

    fn on_clear(&mut self) {
        self.borrow_mut().on_clear();
    }

    fn on_run_state_changed(&mut self, state: RunState, controls_locked: bool) {
        self.borrow_mut().on_run_state_changed(state, controls_locked);
    }
}

/// Registered observers
pub struct ObserverRegistry {
    observers: SlotMap<ObserverKey, Box<dyn SimulationObserver>>,
}

impl ObserverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            observers: SlotMap::with_key(),
        }
    }

    /// Register an observer and return its key
    pub fn add(&mut self, observer: Box<dyn SimulationObserver>) -> ObserverKey {
        self.observers.insert(observer)
    }

    /// Detach an observer
    pub fn remove(&mut self, key: ObserverKey) -> Option<Box<dyn SimulationObserver>> {
        self.observers.remove(key)
    }

    /// Whether a key still refers to a registered observer
    pub fn contains(&self, key: ObserverKey) -> bool {
        self.observers.contains_key(key)
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn display(&mut self, update: &DisplayUpdate) {
        for observer in self.observers.values_mut() {
            observer.on_display(update);
        }
    }

    pub(crate) fn chart_sample(&mut self, sample: &ChartSample) {
        for observer in self.observers.values_mut() {
            observer.on_chart_sample(sample);
        }
    }

    pub(crate) fn particles(&mut self, state: &SpeciesState, census: &ParticleCensus) {
        for observer in self.observers.values_mut() {
            observer.on_particles(state, census);
        }
    }

    pub(crate) fn clear(&mut self) {
        for observer in self.observers.values_mut() {
            observer.on_clear();
        }
    }

    pub(crate) fn run_state_changed(&mut self, state: RunState) {
        let locked = state.controls_locked();
        for observer in self.observers.values_mut() {
            observer.on_run_state_changed(state, locked);
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
