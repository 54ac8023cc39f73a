//! Application systems
//!
//! Host-side pieces that drive a session: frame pacing and the console collaborator.

mod console;
mod simulation;

pub use console::{chart_table, final_state_report, format_display, ConsoleReporter};
pub use simulation::{CancelHandle, RunSummary, SimulationSystem};
