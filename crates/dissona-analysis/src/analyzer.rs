//! Host-facing dissonance analyzer.
//!
//! Wraps [`DissonancePipeline`] in the lifecycle a frequency-domain plugin
//! host drives:
//!
//! ```text
//!                 initialise(ok)
//!  Uninitialized ────────────────► Ready ──process──► Processing ─┐
//!        │                           ▲                    ▲ │     │
//!        │ process: empty set        │ initialise         │ └─────┘ process
//!        ▼ (error logged)            │                    │
//!                                  Reset ─────process─────┘
//!                  reset (from any initialised state) ──► Reset
//! ```
//!
//! Each `process` call yields one untimed feature on each of two outputs:
//! linear dissonance and its base-10 logarithm.

use std::collections::BTreeMap;

use crate::error::{AnalysisError, Result};
use crate::pipeline::{BlockAnalysis, DissonancePipeline, PipelineOptions};

/// Output index of the linear dissonance stream.
pub const LINEAR_OUTPUT: usize = 0;
/// Output index of the log10 dissonance stream.
pub const LOG_OUTPUT: usize = 1;

/// Static description of the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerInfo {
    /// Machine-readable identifier.
    pub identifier: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Author.
    pub maker: &'static str,
    /// Copyright notice.
    pub copyright: &'static str,
    /// Analyzer version.
    pub version: u32,
}

/// Metadata reported to hosts.
pub const ANALYZER_INFO: AnalyzerInfo = AnalyzerInfo {
    identifier: "dissonance",
    name: "Dissonance",
    description: "Calculate the dissonance function of the spectrum of the input signal",
    maker: "Bregman Media Labs",
    copyright: "Freely redistributable (BSD license)",
    version: 2,
};

/// Description of one output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    /// Machine-readable identifier.
    pub identifier: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Unit of the values.
    pub unit: &'static str,
    /// Values per feature.
    pub bin_count: usize,
    /// Whether values have known extents.
    pub has_known_extents: bool,
    /// Whether values are quantized.
    pub is_quantized: bool,
    /// Exactly one feature is produced per process call.
    pub one_sample_per_step: bool,
}

/// A single feature value set. Dissonance features carry no timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// Zero or one value for the dissonance outputs.
    pub values: Vec<f32>,
}

impl Feature {
    /// Feature holding `value` if present, otherwise no values.
    pub fn from_option(value: Option<f32>) -> Self {
        Self {
            values: value.into_iter().collect(),
        }
    }
}

/// Features keyed by output index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    outputs: BTreeMap<usize, Vec<Feature>>,
}

impl FeatureSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a feature to `output`.
    pub fn push(&mut self, output: usize, feature: Feature) {
        self.outputs.entry(output).or_default().push(feature);
    }

    /// Features of one output, empty if none.
    pub fn get(&self, output: usize) -> &[Feature] {
        self.outputs.get(&output).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` when no output carries a feature.
    pub fn is_empty(&self) -> bool {
        self.outputs.values().all(Vec::is_empty)
    }

    /// First value of the first feature on `output`.
    pub fn value(&self, output: usize) -> Option<f32> {
        self.get(output).first()?.values.first().copied()
    }

    fn from_block(block: &BlockAnalysis) -> Self {
        let mut set = Self::new();
        set.push(LINEAR_OUTPUT, Feature::from_option(block.linear));
        set.push(LOG_OUTPUT, Feature::from_option(block.log10));
        set
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerState {
    /// No block/step size yet; processing yields nothing.
    Uninitialized,
    /// Initialised, no block processed since.
    Ready,
    /// At least one block processed.
    Processing,
    /// Reset after initialisation; the next block starts from clean history.
    Reset,
}

/// Block-synchronous dissonance analyzer for one channel.
///
/// # Example
///
/// ```rust
/// use dissona_analysis::analyzer::{DissonanceAnalyzer, LINEAR_OUTPUT};
///
/// let mut analyzer = DissonanceAnalyzer::new(44100.0);
/// analyzer.initialise(1, 1024, 2048).unwrap();
/// let features = analyzer.process(&vec![0.0; 2050]);
/// assert_eq!(features.value(LINEAR_OUTPUT), Some(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct DissonanceAnalyzer {
    sample_rate: f32,
    options: PipelineOptions,
    state: AnalyzerState,
    step_size: usize,
    pipeline: Option<DissonancePipeline>,
}

impl DissonanceAnalyzer {
    /// Creates an analyzer for the given input sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_options(sample_rate, PipelineOptions::default())
    }

    /// Creates an analyzer with custom pipeline options.
    pub fn with_options(sample_rate: f32, options: PipelineOptions) -> Self {
        Self {
            sample_rate,
            options,
            state: AnalyzerState::Uninitialized,
            step_size: 0,
            pipeline: None,
        }
    }

    /// Static metadata.
    pub fn info(&self) -> AnalyzerInfo {
        ANALYZER_INFO
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    /// Input sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Step size set by the last successful [`initialise`](Self::initialise).
    pub fn step_size(&self) -> usize {
        self.step_size
    }

    /// Block size set by the last successful [`initialise`](Self::initialise).
    pub fn block_size(&self) -> usize {
        self.pipeline.as_ref().map_or(0, DissonancePipeline::block_size)
    }

    /// Minimum supported channel count.
    pub fn min_channel_count(&self) -> usize {
        1
    }

    /// Maximum supported channel count.
    pub fn max_channel_count(&self) -> usize {
        1
    }

    /// Block size hosts should prefer.
    pub fn preferred_block_size(&self) -> usize {
        2048
    }

    /// Step size hosts should prefer.
    pub fn preferred_step_size(&self) -> usize {
        1024
    }

    /// Fixes the channel count, step and block sizes.
    ///
    /// On error the analyzer keeps its previous state.
    pub fn initialise(
        &mut self,
        channels: usize,
        step_size: usize,
        block_size: usize,
    ) -> Result<()> {
        if !(self.min_channel_count()..=self.max_channel_count()).contains(&channels) {
            return Err(AnalysisError::ChannelCount(channels));
        }
        if step_size == 0 {
            return Err(AnalysisError::StepSize(step_size));
        }
        let pipeline =
            DissonancePipeline::with_options(block_size, self.sample_rate, self.options.clone())?;

        self.pipeline = Some(pipeline);
        self.step_size = step_size;
        self.transition(AnalyzerState::Ready);
        Ok(())
    }

    /// Output streams, in index order.
    pub fn output_descriptors(&self) -> Vec<OutputDescriptor> {
        let linear = OutputDescriptor {
            identifier: "lineardissonance",
            name: "Dissonance",
            description: "Dissonance function of the linear frequency spectrum",
            unit: "Diss",
            bin_count: 1,
            has_known_extents: false,
            is_quantized: false,
            one_sample_per_step: true,
        };
        let log = OutputDescriptor {
            identifier: "logdissonance",
            name: "Log Dissonance",
            description: "Base-10 logarithm of the dissonance function",
            ..linear.clone()
        };
        vec![linear, log]
    }

    /// Analyses one block's interleaved spectrum.
    ///
    /// Returns an empty set if the analyzer has not been initialised.
    pub fn process(&mut self, spectrum: &[f32]) -> FeatureSet {
        let Some(pipeline) = self.pipeline.as_mut() else {
            tracing::error!("process called before initialise");
            return FeatureSet::new();
        };

        let block = pipeline.process_block(spectrum);
        self.transition(AnalyzerState::Processing);
        FeatureSet::from_block(&block)
    }

    /// Like [`process`](Self::process) but returns the full block analysis.
    pub fn analyze(&mut self, spectrum: &[f32]) -> Option<BlockAnalysis> {
        let Some(pipeline) = self.pipeline.as_mut() else {
            tracing::error!("analyze called before initialise");
            return None;
        };

        let block = pipeline.process_block(spectrum);
        self.transition(AnalyzerState::Processing);
        Some(block)
    }

    /// Features held back until the end of input. Dissonance has none.
    pub fn remaining_features(&mut self) -> FeatureSet {
        FeatureSet::new()
    }

    /// Clears smoother history. No effect before initialisation.
    pub fn reset(&mut self) {
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.reset();
            self.transition(AnalyzerState::Reset);
        }
    }

    fn transition(&mut self, next: AnalyzerState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "analyzer state change");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> DissonanceAnalyzer {
        let mut a = DissonanceAnalyzer::new(10240.0);
        a.initialise(1, 1024, 2048).unwrap();
        a
    }

    #[test]
    fn test_uninitialized_process_is_empty() {
        let mut a = DissonanceAnalyzer::new(44100.0);
        assert_eq!(a.state(), AnalyzerState::Uninitialized);
        assert!(a.process(&[0.0; 16]).is_empty());
        assert!(a.analyze(&[0.0; 16]).is_none());
        assert_eq!(a.state(), AnalyzerState::Uninitialized);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut a = ready();
        assert_eq!(a.state(), AnalyzerState::Ready);
        a.process(&[0.0; 2050]);
        assert_eq!(a.state(), AnalyzerState::Processing);
        a.reset();
        assert_eq!(a.state(), AnalyzerState::Reset);
        a.process(&[0.0; 2050]);
        assert_eq!(a.state(), AnalyzerState::Processing);
        a.initialise(1, 512, 1024).unwrap();
        assert_eq!(a.state(), AnalyzerState::Ready);
        assert_eq!(a.block_size(), 1024);
    }

    #[test]
    fn test_reset_before_initialise_is_noop() {
        let mut a = DissonanceAnalyzer::new(44100.0);
        a.reset();
        assert_eq!(a.state(), AnalyzerState::Uninitialized);
    }

    #[test]
    fn test_initialise_validation() {
        let mut a = DissonanceAnalyzer::new(44100.0);
        assert_eq!(
            a.initialise(2, 1024, 2048),
            Err(AnalysisError::ChannelCount(2))
        );
        assert_eq!(
            a.initialise(0, 1024, 2048),
            Err(AnalysisError::ChannelCount(0))
        );
        assert_eq!(a.initialise(1, 0, 2048), Err(AnalysisError::StepSize(0)));
        assert_eq!(
            a.initialise(1, 1024, 2047),
            Err(AnalysisError::BlockSize(2047))
        );
        assert_eq!(a.state(), AnalyzerState::Uninitialized);
    }

    #[test]
    fn test_failed_reinitialise_keeps_previous_setup() {
        let mut a = ready();
        assert!(a.initialise(1, 1024, 3).is_err());
        assert_eq!(a.block_size(), 2048);
        assert_eq!(a.state(), AnalyzerState::Ready);
    }

    #[test]
    fn test_two_outputs_one_feature_each() {
        let mut a = ready();
        let mut spectrum = vec![0.0; 2050];
        spectrum[88 * 2] = 1024.0;
        spectrum[90 * 2] = 1024.0;
        let set = a.process(&spectrum);
        assert_eq!(set.get(LINEAR_OUTPUT).len(), 1);
        assert_eq!(set.get(LOG_OUTPUT).len(), 1);
        let lin = set.value(LINEAR_OUTPUT).unwrap();
        let log = set.value(LOG_OUTPUT).unwrap();
        assert!((log - lin.log10()).abs() < 1e-6);
    }

    #[test]
    fn test_dropped_value_leaves_empty_feature() {
        let mut a = ready();
        let mut spectrum = vec![0.0; 2050];
        spectrum[100 * 2] = 1024.0;
        let set = a.process(&spectrum);
        assert_eq!(set.value(LINEAR_OUTPUT), Some(0.0));
        assert_eq!(set.get(LOG_OUTPUT).len(), 1);
        assert!(set.get(LOG_OUTPUT)[0].values.is_empty());
    }

    #[test]
    fn test_descriptors_and_metadata() {
        let mut a = DissonanceAnalyzer::new(44100.0);
        let d = a.output_descriptors();
        assert_eq!(d.len(), 2);
        assert_eq!(d[LINEAR_OUTPUT].identifier, "lineardissonance");
        assert_eq!(d[LOG_OUTPUT].identifier, "logdissonance");
        assert!(d.iter().all(|o| o.unit == "Diss" && o.bin_count == 1));
        assert_eq!(a.info().identifier, "dissonance");
        assert_eq!(a.info().version, 2);
        assert_eq!(a.preferred_block_size(), 2048);
        assert_eq!(a.preferred_step_size(), 1024);
        assert!(a.remaining_features().is_empty());
    }
}
