//! Fixed-step simulation clock

/// Absorbs products like `70 * 0.1` landing just under a whole unit
const UNIT_EPSILON: f64 = 1e-9;

/// Counts ticks and derives simulated time from the count
///
/// Time is `ticks * time_step` rather than a running float sum, so the
/// horizon and the chart cadence depend only on the tick count.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationClock {
    time_step: f64,
    max_time: f64,
    ticks: u64,
}

impl SimulationClock {
    /// Create a clock at t = 0
    ///
    /// `time_step` must be positive and finite; the session validates this.
    pub fn new(time_step: f64, max_time: f64) -> Self {
        Self {
            time_step,
            max_time,
            ticks: 0,
        }
    }

    /// Current simulated time
    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.time_step
    }

    /// Step size
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Time horizon
    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    /// Number of ticks since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance by one step and return the new tick count
    pub fn advance(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    /// Whether the horizon has been reached
    pub fn is_expired(&self) -> bool {
        self.time() >= self.max_time
    }

    /// Whole units of simulated time completed after `ticks` steps
    fn whole_units(&self, ticks: u64) -> u64 {
        (ticks as f64 * self.time_step + UNIT_EPSILON).floor() as u64
    }

    /// The whole time unit the last tick crossed, if any
    ///
    /// A step longer than one unit can cross several; the latest is returned.
    pub fn crossed_unit(&self) -> Option<u64> {
        if self.ticks == 0 {
            return None;
        }
        let now = self.whole_units(self.ticks);
        (now > self.whole_units(self.ticks - 1)).then_some(now)
    }

    /// Chart label for the unit boundary the last tick crossed
    pub fn sample_label(&self) -> Option<String> {
        self.crossed_unit().map(|unit| format!("{:.1}", unit as f64))
    }

    /// Current time formatted for display (one decimal)
    pub fn label(&self) -> String {
        format!("{:.1}", self.time())
    }

    /// Back to t = 0
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_starts_at_zero() {
        let clock = SimulationClock::new(0.05, 200.0);
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.ticks(), 0);
        assert!(!clock.is_expired());
        assert_eq!(clock.crossed_unit(), None);
    }

    /// Labels of every sample tick until the horizon
    fn sample_labels(time_step: f64, max_time: f64) -> Vec<String> {
        let mut clock = SimulationClock::new(time_step, max_time);
        let mut labels = Vec::new();
        while !clock.is_expired() {
            clock.advance();
            if let Some(label) = clock.sample_label() {
                labels.push(label);
            }
        }
        labels
    }

    fn whole_unit_labels(n: u64) -> Vec<String> {
        (1..=n).map(|u| format!("{:.1}", u as f64)).collect()
    }

    #[test]
    fn test_expires_exactly_at_horizon() {
        let mut clock = SimulationClock::new(0.05, 200.0);
        while !clock.is_expired() {
            clock.advance();
        }
        assert_eq!(clock.ticks(), 4000);
        assert!(clock.time() >= 200.0);
    }

    #[test]
    fn test_no_drift_over_long_runs() {
        let mut clock = SimulationClock::new(0.1, 1000.0);
        let mut summed = 0.0;
        for _ in 0..10_000 {
            clock.advance();
            summed += 0.1;
        }
        // The running sum drifts; the clock does not
        assert_eq!(clock.time(), 10_000.0 * 0.1);
        assert!((summed - clock.time()).abs() < 1e-6);
    }

    #[test]
    fn test_sample_ticks_once_per_unit() {
        let mut clock = SimulationClock::new(0.05, 10.0);
        let mut samples = Vec::new();
        while !clock.is_expired() {
            clock.advance();
            if clock.crossed_unit().is_some() {
                samples.push(clock.label());
            }
        }
        assert_eq!(samples.len(), 10);
        assert_eq!(samples.first().map(String::as_str), Some("1.0"));
        assert_eq!(samples.last().map(String::as_str), Some("10.0"));
    }

    #[test]
    fn test_default_step_samples_every_unit() {
        assert_eq!(sample_labels(0.05, 200.0), whole_unit_labels(200));
        assert_eq!(sample_labels(0.1, 200.0), whole_unit_labels(200));
    }

    #[test]
    fn test_step_not_dividing_one_samples_on_whole_units() {
        // 0.4 crosses a unit every 2 or 3 ticks
        assert_eq!(sample_labels(0.4, 10.0), whole_unit_labels(10));
        assert_eq!(sample_labels(0.3, 3.0), vec!["1.0", "2.0", "3.0"]);
        assert_eq!(sample_labels(0.3, 10.0), whole_unit_labels(10));
    }

    #[test]
    fn test_sample_tick_spacing_with_uneven_step() {
        let mut clock = SimulationClock::new(0.4, 10.0);
        let mut sample_ticks = Vec::new();
        while !clock.is_expired() {
            clock.advance();
            if clock.crossed_unit().is_some() {
                sample_ticks.push(clock.ticks());
            }
        }
        assert_eq!(&sample_ticks[..4], &[3, 5, 8, 10]);
    }

    #[test]
    fn test_long_step_labels_latest_unit_crossed() {
        // 2.5 per tick: 2.5, 5.0, 7.5, 10.0
        assert_eq!(sample_labels(2.5, 10.0), vec!["2.0", "5.0", "7.0", "10.0"]);
    }

    #[test]
    fn test_reset() {
        let mut clock = SimulationClock::new(0.05, 200.0);
        clock.advance();
        clock.advance();
        clock.reset();
        assert_eq!(clock.ticks(), 0);
        assert_eq!(clock.time(), 0.0);
    }
}
