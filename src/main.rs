//! Guerbet - ethanol upgrading kinetics demo
//!
//! Runs one simulation session to its time horizon and prints the chart
//! series and final concentrations.

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use guerbet::config::AppConfig;
use guerbet::systems::{chart_table, final_state_report, ConsoleReporter, SimulationSystem};
use guerbet_core::{RateSchedule, Scenario, SeriesRecorder, SimulationSession};

fn main() {
    // Configuration decides the log level, so load it before the logger
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let scenario = match &config.scenario.path {
        Some(path) => {
            let scenario = Scenario::load(path)
                .map_err(|e| format!("Failed to load scenario '{}': {}", path, e))?;
            log::info!("Loaded scenario '{}' from {}", scenario.name, path);
            Some(scenario)
        }
        None => None,
    };

    let mut session_config = config.to_session_config()?;
    let controls = match &scenario {
        Some(scenario) => {
            session_config = scenario.apply_to(session_config);
            scenario.rate_schedule()
        }
        None => RateSchedule::new(config.rates.to_rate_constants()),
    };

    let mut session = SimulationSession::with_config(session_config)?;
    let recorder = Rc::new(RefCell::new(SeriesRecorder::new()));
    session.add_observer(ConsoleReporter::new());
    session.add_observer(recorder.clone());

    let mut system = SimulationSystem::new(config.scheduler.frame_rate);
    session.start();
    let summary = system.run(&mut session, &controls);

    log::info!(
        "Finished after {} frames in state {:?}",
        summary.frames,
        summary.final_state
    );
    if session.clamped_total() > 0.0 {
        log::warn!(
            "Floored {:.6} mol/L of overshoot at zero over the run; consider a smaller time step",
            session.clamped_total()
        );
    }

    print!(
        "{}",
        chart_table(&recorder.borrow(), &session.config().chart_species)
    );
    println!();
    print!("{}", final_state_report(session.state()));

    Ok(())
}
