//! In-memory chart history

use guerbet_kinetics::Species;

use crate::observer::{ChartSample, SimulationObserver};

/// Accumulates chart samples until the session clears them
///
/// This is the data side of the line chart: labels along the time axis and
/// one series per charted species.
#[derive(Clone, Debug, Default)]
pub struct SeriesRecorder {
    samples: Vec<ChartSample>,
}

impl SeriesRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples in time order
    pub fn samples(&self) -> &[ChartSample] {
        &self.samples
    }

    /// Number of recorded points
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing has been recorded since the last clear
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time-axis labels
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.samples.iter().map(|s| s.label.as_str())
    }

    /// Values of one species across all samples that chart it
    pub fn series(&self, species: Species) -> Vec<f64> {
        self.samples.iter().filter_map(|s| s.value(species)).collect()
    }

    /// Most recent sample
    pub fn last(&self) -> Option<&ChartSample> {
        self.samples.last()
    }
}

impl SimulationObserver for SeriesRecorder {
    fn on_chart_sample(&mut self, sample: &ChartSample) {
        self.samples.push(sample.clone());
    }

    fn on_clear(&mut self) {
        self.samples.clear();
    }
}
