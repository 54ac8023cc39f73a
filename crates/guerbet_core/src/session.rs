//! Simulation session: state, clock and run lifecycle
//!
//! A session owns the species state and is its only writer. The host drives
//! it one tick at a time:
//!
//! ```ignore
//! let mut session = SimulationSession::new();
//! session.add_observer(SeriesRecorder::new());
//!
//! session.start();
//! while session.is_running() {
//!     session.tick(&sliders);
//!     // yield to the host until the next frame
//! }
//! ```
//!
//! Run states: `Idle -> Running -> (Idle | Completed)`. `reset` and `cancel`
//! are valid from any state and always return to a fresh `Idle` session.

use std::fmt;

use guerbet_kinetics::{advance_in_place, Species, SpeciesState, DEFAULT_INITIAL_CONCENTRATION};

use crate::census::{ParticleCensus, DEFAULT_MOLECULE_COUNT};
use crate::clock::SimulationClock;
use crate::control::ControlSurface;
use crate::observer::{
    ChartSample, DisplayUpdate, Notifications, ObserverKey, ObserverRegistry, SimulationObserver,
};

/// Lifecycle of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Not running; state is at the initial charge
    Idle,
    /// Ticks are being scheduled
    Running,
    /// The time horizon was reached; state holds the final values
    Completed,
}

impl RunState {
    /// Controls (start button, sliders) are locked while a run is in progress
    pub fn controls_locked(self) -> bool {
        self == RunState::Running
    }
}

/// Result of a call to [`SimulationSession::tick`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Session was not running; nothing happened
    Idle,
    /// Session had already completed; nothing happened
    Completed,
    /// One integration step ran
    Stepped {
        /// Notifications sent to observers for this step
        notified: Notifications,
        /// This step reached the horizon and the run is now complete
        completed: bool,
    },
}

/// Configuration of a session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Fixed integration step
    pub time_step: f64,
    /// Simulated time at which a run completes
    pub max_time: f64,
    /// Ethanol concentration of a fresh charge
    pub initial_concentration: f64,
    /// Molecules in the particle census
    pub molecule_count: u32,
    /// Species shown on the textual display
    pub tracked_species: [Species; 2],
    /// Species plotted on the chart
    pub chart_species: Vec<Species>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_step: 0.05,
            max_time: 200.0,
            initial_concentration: DEFAULT_INITIAL_CONCENTRATION,
            molecule_count: DEFAULT_MOLECULE_COUNT,
            tracked_species: [Species::C4Oh, Species::C6Oh],
            chart_species: vec![Species::C2Oh, Species::C4Oh, Species::C6Oh],
        }
    }
}

impl SessionConfig {
    /// Set the integration step
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Set the time horizon
    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    /// Check the values the clock and census depend on
    pub fn validate(&self) -> Result<(), SessionError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SessionError::InvalidTimeStep(self.time_step));
        }
        if !self.max_time.is_finite() || self.max_time < 0.0 {
            return Err(SessionError::InvalidMaxTime(self.max_time));
        }
        if self.molecule_count == 0 {
            return Err(SessionError::InvalidMoleculeCount);
        }
        Ok(())
    }

    fn initial_state(&self) -> SpeciesState {
        SpeciesState::with_feed(self.initial_concentration)
    }
}

/// Invalid session configuration
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Time step must be finite and positive
    InvalidTimeStep(f64),
    /// Horizon must be finite and non-negative
    InvalidMaxTime(f64),
    /// Particle census needs at least one molecule
    InvalidMoleculeCount,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidTimeStep(dt) => {
                write!(f, "Invalid time step {}: must be finite and positive", dt)
            }
            SessionError::InvalidMaxTime(t) => {
                write!(f, "Invalid max time {}: must be finite and non-negative", t)
            }
            SessionError::InvalidMoleculeCount => write!(f, "Molecule count must be at least 1"),
        }
    }
}

impl std::error::Error for SessionError {}

/// A simulation run and everything it owns
pub struct SimulationSession {
    config: SessionConfig,
    state: SpeciesState,
    clock: SimulationClock,
    run_state: RunState,
    observers: ObserverRegistry,
    /// Overshoot floored at zero since the last reset
    clamped_total: f64,
}

impl SimulationSession {
    /// Create a session with the default configuration
    pub fn new() -> Self {
        Self::from_valid_config(SessionConfig::default())
    }

    /// Create a session with a custom configuration
    pub fn with_config(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SessionConfig) -> Self {
        Self {
            state: config.initial_state(),
            clock: SimulationClock::new(config.time_step, config.max_time),
            run_state: RunState::Idle,
            observers: ObserverRegistry::new(),
            clamped_total: 0.0,
            config,
        }
    }

    // --- Observers ---

    /// Register a collaborator
    pub fn add_observer(&mut self, observer: impl SimulationObserver + 'static) -> ObserverKey {
        self.observers.add(Box::new(observer))
    }

    /// Detach a collaborator
    pub fn remove_observer(&mut self, key: ObserverKey) -> bool {
        self.observers.remove(key).is_some()
    }

    /// Number of registered collaborators
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // --- Read access ---

    /// Current concentrations
    pub fn state(&self) -> &SpeciesState {
        &self.state
    }

    /// Current simulated time
    pub fn sim_time(&self) -> f64 {
        self.clock.time()
    }

    /// Clock (tick count, step, horizon)
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Current run state
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Whether another tick should be scheduled
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Configuration this session was built with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Concentration added back by flooring overshoot at zero since the last reset
    pub fn clamped_total(&self) -> f64 {
        self.clamped_total
    }

    /// Particle census of the current state
    pub fn census(&self) -> ParticleCensus {
        ParticleCensus::from_state(&self.state, self.config.molecule_count)
    }

    // --- Lifecycle ---

    /// Begin a fresh run from the initial charge
    ///
    /// Any previous trajectory is discarded, including one in progress.
    pub fn start(&mut self) {
        self.reinitialize();
        log::info!(
            "Starting run: dt = {}, horizon = {}",
            self.config.time_step,
            self.config.max_time
        );
        self.set_run_state(RunState::Running);
    }

    /// Stop any run and return to the initial charge
    pub fn reset(&mut self) {
        self.reinitialize();
        self.set_run_state(RunState::Idle);
    }

    /// Abandon the current run
    ///
    /// Takes effect between ticks: the host calls this instead of
    /// scheduling the next tick. Same end state as [`reset`](Self::reset).
    pub fn cancel(&mut self) {
        if self.is_running() {
            log::info!("Run cancelled at t = {}", self.clock.label());
        }
        self.reset();
    }

    /// Run one integration step if the session is running
    ///
    /// Reads the constants from `controls`, advances state and clock, then
    /// notifies observers. The tick that reaches the horizon completes the
    /// run, so the host never needs to schedule another one.
    pub fn tick<C: ControlSurface + ?Sized>(&mut self, controls: &C) -> TickOutcome {
        match self.run_state {
            RunState::Idle => return TickOutcome::Idle,
            RunState::Completed => return TickOutcome::Completed,
            RunState::Running => {}
        }

        if self.clock.is_expired() {
            self.complete();
            return TickOutcome::Completed;
        }

        let constants = controls.rate_constants(self.clock.time());
        let report = advance_in_place(&mut self.state, &constants, self.clock.time_step());

        if report.clamped > 0.0 {
            if self.clamped_total == 0.0 {
                log::warn!(
                    "Euler step overshot below zero at t = {}; clamping (k = {:?})",
                    self.clock.label(),
                    constants
                );
            }
            self.clamped_total += report.clamped;
        }

        if log::log_enabled!(log::Level::Trace) {
            for (reaction, rate) in report.rates.iter() {
                log::trace!("{} = {:.6}", reaction.name(), rate);
            }
        }

        self.clock.advance();

        let mut notified = Notifications::DISPLAY | Notifications::PARTICLES;
        self.notify_display();
        let census = self.census();
        self.observers.particles(&self.state, &census);

        if let Some(label) = self.clock.sample_label() {
            let sample = ChartSample {
                label,
                sim_time: self.clock.time(),
                values: self
                    .config
                    .chart_species
                    .iter()
                    .map(|&s| (s, self.state[s]))
                    .collect(),
            };
            self.observers.chart_sample(&sample);
            notified |= Notifications::CHART;
        }

        let completed = self.clock.is_expired();
        if completed {
            self.complete();
        }

        TickOutcome::Stepped { notified, completed }
    }

    fn complete(&mut self) {
        log::info!(
            "Run completed at t = {} after {} ticks",
            self.clock.label(),
            self.clock.ticks()
        );
        self.set_run_state(RunState::Completed);
    }

    fn reinitialize(&mut self) {
        self.state = self.config.initial_state();
        self.clock.reset();
        self.clamped_total = 0.0;
        self.observers.clear();
        self.notify_display();
    }

    fn set_run_state(&mut self, run_state: RunState) {
        if self.run_state != run_state {
            log::debug!("Run state {:?} -> {:?}", self.run_state, run_state);
            self.run_state = run_state;
            self.observers.run_state_changed(run_state);
        }
    }

    fn notify_display(&mut self) {
        let [a, b] = self.config.tracked_species;
        let update = DisplayUpdate {
            sim_time: self.clock.time(),
            tracked: [(a, self.state[a]), (b, self.state[b])],
        };
        self.observers.display(&update);
    }
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guerbet_kinetics::RateConstants;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        run_states: Vec<(RunState, bool)>,
        displays: usize,
        clears: usize,
    }

    impl SimulationObserver for Log {
        fn on_display(&mut self, _update: &DisplayUpdate) {
            self.displays += 1;
        }

        fn on_clear(&mut self) {
            self.clears += 1;
        }

        fn on_run_state_changed(&mut self, state: RunState, controls_locked: bool) {
            self.run_states.push((state, controls_locked));
        }
    }

    fn short_config() -> SessionConfig {
        SessionConfig::default().with_max_time(1.0)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = SimulationSession::new();
        assert_eq!(session.run_state(), RunState::Idle);
        assert_eq!(session.sim_time(), 0.0);
        assert_eq!(*session.state(), SpeciesState::initial());
    }

    #[test]
    fn test_validate_rejects_bad_time_step() {
        for dt in [0.0, -0.05, f64::NAN, f64::INFINITY] {
            let result = SimulationSession::with_config(SessionConfig::default().with_time_step(dt));
            assert!(matches!(result, Err(SessionError::InvalidTimeStep(_))));
        }
    }

    #[test]
    fn test_validate_rejects_bad_max_time() {
        let result = SimulationSession::with_config(SessionConfig::default().with_max_time(-1.0));
        assert!(matches!(result, Err(SessionError::InvalidMaxTime(_))));
    }

    #[test]
    fn test_validate_rejects_zero_molecules() {
        let config = SessionConfig {
            molecule_count: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(SessionError::InvalidMoleculeCount));
    }

    #[test]
    fn test_error_display() {
        let msg = format!("{}", SessionError::InvalidTimeStep(-1.0));
        assert!(msg.contains("time step"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn test_tick_while_idle_does_nothing() {
        let mut session = SimulationSession::new();
        let outcome = session.tick(&RateConstants::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(outcome, TickOutcome::Idle);
        assert_eq!(*session.state(), SpeciesState::initial());
        assert_eq!(session.clock().ticks(), 0);
    }

    #[test]
    fn test_single_tick() {
        let mut session = SimulationSession::new();
        session.start();
        let outcome = session.tick(&RateConstants::new(1.0, 0.0, 0.0, 0.0));

        assert_eq!(
            outcome,
            TickOutcome::Stepped {
                notified: Notifications::DISPLAY | Notifications::PARTICLES,
                completed: false,
            }
        );
        assert!((session.sim_time() - 0.05).abs() < 1e-12);
        assert!((session.state()[Species::C2Oh] - 0.95).abs() < 1e-12);
        assert!((session.state()[Species::C2Cho] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_completion_on_horizon_tick() {
        let mut session = SimulationSession::with_config(short_config()).unwrap();
        session.start();
        let k = RateConstants::default();

        let mut ticks = 0;
        loop {
            let before = session.sim_time();
            assert!(before < 1.0);
            match session.tick(&k) {
                TickOutcome::Stepped { completed: false, .. } => ticks += 1,
                TickOutcome::Stepped { completed: true, notified } => {
                    ticks += 1;
                    // t = 1.0 is also a chart boundary
                    assert!(notified.contains(Notifications::CHART));
                    break;
                }
                other => panic!("Unexpected outcome {:?}", other),
            }
        }

        assert_eq!(ticks, 20);
        assert_eq!(session.run_state(), RunState::Completed);
        assert_eq!(session.tick(&k), TickOutcome::Completed);
        assert_eq!(session.clock().ticks(), 20);
    }

    #[test]
    fn test_zero_horizon_completes_without_stepping() {
        let config = SessionConfig::default().with_max_time(0.0);
        let mut session = SimulationSession::with_config(config).unwrap();
        session.start();

        assert_eq!(session.tick(&RateConstants::default()), TickOutcome::Completed);
        assert_eq!(session.run_state(), RunState::Completed);
        assert_eq!(*session.state(), SpeciesState::initial());
    }

    #[test]
    fn test_reset_from_running() {
        let mut session = SimulationSession::new();
        session.start();
        for _ in 0..50 {
            session.tick(&RateConstants::new(0.5, 0.5, 0.5, 0.5));
        }
        session.reset();

        assert_eq!(session.run_state(), RunState::Idle);
        assert_eq!(session.sim_time(), 0.0);
        assert_eq!(*session.state(), SpeciesState::initial());
        assert_eq!(session.clamped_total(), 0.0);
    }

    #[test]
    fn test_cancel_matches_reset() {
        let mut session = SimulationSession::new();
        session.start();
        session.tick(&RateConstants::default());
        session.cancel();

        assert_eq!(session.run_state(), RunState::Idle);
        assert_eq!(*session.state(), SpeciesState::initial());
        assert_eq!(session.tick(&RateConstants::default()), TickOutcome::Idle);
    }

    #[test]
    fn test_run_state_notifications_lock_controls() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut session = SimulationSession::with_config(short_config()).unwrap();
        session.add_observer(log.clone());

        session.start();
        while session.is_running() {
            session.tick(&RateConstants::default());
        }
        session.reset();

        assert_eq!(
            log.borrow().run_states,
            vec![
                (RunState::Running, true),
                (RunState::Completed, false),
                (RunState::Idle, false),
            ]
        );
    }

    #[test]
    fn test_start_and_reset_clear_observers() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut session = SimulationSession::new();
        session.add_observer(log.clone());

        session.start();
        session.tick(&RateConstants::default());
        session.reset();

        let log = log.borrow();
        assert_eq!(log.clears, 2);
        // start, tick, reset
        assert_eq!(log.displays, 3);
    }

    #[test]
    fn test_remove_observer() {
        let mut session = SimulationSession::new();
        let key = session.add_observer(Log::default());
        assert_eq!(session.observer_count(), 1);
        assert!(session.remove_observer(key));
        assert!(!session.remove_observer(key));
        assert_eq!(session.observer_count(), 0);
    }

    #[test]
    fn test_clamped_total_accumulates() {
        let mut session = SimulationSession::new();
        session.start();
        session.tick(&RateConstants::new(40.0, 0.0, 0.0, 0.0));
        assert!((session.clamped_total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_feed() {
        let config = SessionConfig {
            initial_concentration: 2.0,
            ..SessionConfig::default()
        };
        let mut session = SimulationSession::with_config(config).unwrap();
        assert_eq!(session.state()[Species::C2Oh], 2.0);

        session.start();
        session.tick(&RateConstants::new(1.0, 0.0, 0.0, 0.0));
        session.reset();
        assert_eq!(session.state()[Species::C2Oh], 2.0);
    }
}
