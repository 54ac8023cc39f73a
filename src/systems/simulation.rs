//! Simulation scheduling system
//!
//! Drives a session the way an animation loop would:
//! - One tick per frame, never two at once
//! - Optional frame pacing against the wall clock
//! - Cancellation checked at every frame boundary
//!
//! Simulated time is decoupled from wall time: pacing only decides *when*
//! the next tick runs, never how large it is.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use guerbet_core::{ControlSurface, RunState, SimulationSession, TickOutcome};

/// Shared flag the host (or a collaborator) sets to stop the run
///
/// The request is honoured before the next tick; a tick in progress always
/// finishes first.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    requested: Rc<Cell<bool>>,
}

impl CancelHandle {
    /// Ask the scheduler to cancel at the next frame boundary
    pub fn request(&self) {
        self.requested.set(true);
    }

    /// Whether a cancellation is pending
    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    fn take(&self) -> bool {
        self.requested.replace(false)
    }
}

/// Outcome of [`SimulationSystem::run`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Frames in which a tick was attempted
    pub frames: u64,
    /// Run state when the loop exited
    pub final_state: RunState,
    /// Whether the run ended through cancellation
    pub cancelled: bool,
}

/// Schedules session ticks one frame at a time
pub struct SimulationSystem {
    frame_duration: Option<Duration>,
    last_frame: Instant,
    cancel: CancelHandle,
}

impl SimulationSystem {
    /// Create a system pacing ticks at `frame_rate` per second
    ///
    /// A rate of zero (or anything non-positive) runs unpaced.
    pub fn new(frame_rate: f64) -> Self {
        let frame_duration = if frame_rate.is_finite() && frame_rate > 0.0 {
            Some(Duration::from_secs_f64(1.0 / frame_rate))
        } else {
            None
        };
        Self {
            frame_duration,
            last_frame: Instant::now(),
            cancel: CancelHandle::default(),
        }
    }

    /// Handle for requesting cancellation
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run one frame
    ///
    /// A pending cancellation is applied instead of ticking.
    pub fn frame<C: ControlSurface + ?Sized>(
        &mut self,
        session: &mut SimulationSession,
        controls: &C,
    ) -> TickOutcome {
        if self.cancel.take() {
            session.cancel();
            return TickOutcome::Idle;
        }
        session.tick(controls)
    }

    /// Tick the session every frame until it stops running
    pub fn run<C: ControlSurface + ?Sized>(
        &mut self,
        session: &mut SimulationSession,
        controls: &C,
    ) -> RunSummary {
        let mut frames = 0;
        let mut cancelled = false;
        self.last_frame = Instant::now();

        while session.is_running() {
            self.wait_for_next_frame();
            if self.cancel.is_requested() {
                cancelled = true;
            }
            self.frame(session, controls);
            frames += 1;
        }

        RunSummary {
            frames,
            final_state: session.run_state(),
            cancelled,
        }
    }

    /// Sleep out whatever is left of the current frame
    fn wait_for_next_frame(&mut self) {
        if let Some(frame) = self.frame_duration {
            let elapsed = self.last_frame.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }
        self.last_frame = Instant::now();
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(60.0)
    }
}
