//! Console collaborator
//!
//! Stands in for the display, chart and particle views by writing what they
//! would show to the log, and formats the end-of-run report for stdout.

use std::fmt::Write;

use guerbet_core::{
    ChartSample, DisplayUpdate, ParticleCensus, RunState, SeriesRecorder, SimulationObserver,
    Species, SpeciesState,
};

/// Format the textual display line
pub fn format_display(update: &DisplayUpdate) -> String {
    let [(a, ca), (b, cb)] = update.tracked;
    format!(
        "t = {:.1} s | {} = {:.3} | {} = {:.3}",
        update.sim_time, a, ca, b, cb
    )
}

/// Tab-separated table of the recorded chart, one row per sample
pub fn chart_table(recorder: &SeriesRecorder, species: &[Species]) -> String {
    let mut out = String::from("t");
    for s in species {
        let _ = write!(out, "\t{}", s);
    }
    out.push('\n');

    for sample in recorder.samples() {
        out.push_str(&sample.label);
        for s in species {
            match sample.value(*s) {
                Some(v) => {
                    let _ = write!(out, "\t{:.4}", v);
                }
                None => out.push_str("\t-"),
            }
        }
        out.push('\n');
    }
    out
}

/// One line per species with its final concentration
pub fn final_state_report(state: &SpeciesState) -> String {
    let mut out = String::new();
    for (species, c) in state.iter() {
        let _ = writeln!(out, "{:<8} {:.4}", species.name(), c);
    }
    let _ = writeln!(out, "{:<8} {:.4}", "total", state.total());
    out
}

/// Logs every notification a session sends
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    displays: u64,
    last_display: Option<String>,
}

impl ConsoleReporter {
    /// Create a reporter that has seen no updates
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of display updates seen
    pub fn display_count(&self) -> u64 {
        self.displays
    }

    /// Most recent display line
    pub fn last_display(&self) -> Option<&str> {
        self.last_display.as_deref()
    }
}

impl SimulationObserver for ConsoleReporter {
    fn on_display(&mut self, update: &DisplayUpdate) {
        let line = format_display(update);
        log::debug!("{}", line);
        self.displays += 1;
        self.last_display = Some(line);
    }

    fn on_chart_sample(&mut self, sample: &ChartSample) {
        let values: Vec<String> = sample
            .values
            .iter()
            .map(|(s, v)| format!("{}={:.3}", s, v))
            .collect();
        log::info!("[chart t={}] {}", sample.label, values.join(" "));
    }

    fn on_particles(&mut self, _state: &SpeciesState, census: &ParticleCensus) {
        log::trace!(
            "Particles: C2={} C4={} C6={} intermediate={}",
            census.c2,
            census.c4,
            census.c6,
            census.intermediate
        );
    }

    fn on_clear(&mut self) {
        self.last_display = None;
    }

    fn on_run_state_changed(&mut self, state: RunState, controls_locked: bool) {
        log::info!(
            "Run state: {:?} (controls {})",
            state,
            if controls_locked { "locked" } else { "unlocked" }
        );
    }
}
