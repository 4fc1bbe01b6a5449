//! Per-block dissonance extraction.
//!
//! ```text
//! interleaved spectrum
//!     │
//!     ├─► SpectralFrame (bins 1..=N/2, |X|/(N/2))
//!     │       │
//!     │       ├─► smooth_zero_phase ─► smoothed envelope
//!     │       │
//!     │       └─► PeakPicker (derivative of the raw magnitudes)
//!     │                 │
//!     │                 └─► select_partials (≤ 20, by magnitude)
//!     │                           │
//!     │                           └─► RoughnessModel::total
//!     │
//!     └─► BlockAnalysis { linear, log10 }
//! ```
//!
//! The smoothed envelope is computed every block but peak picking runs on the
//! unsmoothed magnitudes. The envelope is returned for inspection and the
//! smoother's delay line carries across blocks.

use dissona_core::{Filter, IirFilter};

use crate::error::{AnalysisError, Result};
use crate::frame::SpectralFrame;
use crate::partials::{MAX_PARTIALS, Partial, select_partials};
use crate::peaks::{DEFAULT_PEAK_THRESHOLD, PeakPicker};
use crate::roughness::RoughnessModel;
use crate::smoothing::smooth_zero_phase;

/// How a block's features came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Both values are finite.
    Ok,
    /// No spectral peaks; both values are reported as zero.
    NoPeaks,
    /// At least one value was not finite and has been dropped.
    NonFinite,
}

/// Everything computed for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockAnalysis {
    /// Summed roughness, if finite.
    pub linear: Option<f32>,
    /// `log10` of the summed roughness, if finite.
    pub log10: Option<f32>,
    /// Partials that entered the sum, ascending frequency.
    pub partials: Vec<Partial>,
    /// Zero-phase smoothed magnitude envelope.
    pub smoothed: Vec<f32>,
    /// Classification of the result.
    pub outcome: BlockOutcome,
}

/// Tunables for [`DissonancePipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Derivative threshold for peak picking.
    pub peak_threshold: f32,
    /// Maximum partials entering the roughness sum.
    pub max_partials: usize,
    /// Spectral smoother.
    pub smoother: IirFilter,
    /// Roughness curve.
    pub model: RoughnessModel,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            max_partials: MAX_PARTIALS,
            smoother: IirFilter::spectral_lowpass(),
            model: RoughnessModel::default(),
        }
    }
}

/// Stateful per-block analysis for one channel.
#[derive(Debug, Clone)]
pub struct DissonancePipeline {
    block_size: usize,
    sample_rate: f32,
    smoother: IirFilter,
    picker: PeakPicker,
    max_partials: usize,
    model: RoughnessModel,
}

impl DissonancePipeline {
    /// Creates a pipeline with default options.
    pub fn new(block_size: usize, sample_rate: f32) -> Result<Self> {
        Self::with_options(block_size, sample_rate, PipelineOptions::default())
    }

    /// Creates a pipeline with explicit options.
    pub fn with_options(
        block_size: usize,
        sample_rate: f32,
        options: PipelineOptions,
    ) -> Result<Self> {
        if block_size == 0 || block_size % 2 != 0 {
            return Err(AnalysisError::BlockSize(block_size));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::SampleRate(sample_rate));
        }

        Ok(Self {
            block_size,
            sample_rate,
            smoother: options.smoother,
            picker: PeakPicker::new(options.peak_threshold),
            max_partials: options.max_partials,
            model: options.model,
        })
    }

    /// Block size in samples.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Analyses one interleaved spectrum.
    pub fn process_block(&mut self, spectrum: &[f32]) -> BlockAnalysis {
        let frame = SpectralFrame::from_interleaved(spectrum, self.block_size, self.sample_rate);
        let smoothed = smooth_zero_phase(&mut self.smoother, frame.magnitudes());

        let peaks = self.picker.detect(frame.magnitudes());
        if peaks.is_empty() {
            tracing::warn!(block_size = self.block_size, "no spectral peaks in block");
            return BlockAnalysis {
                linear: Some(0.0),
                log10: Some(0.0),
                partials: Vec::new(),
                smoothed,
                outcome: BlockOutcome::NoPeaks,
            };
        }

        let partials = select_partials(&frame, &peaks, self.max_partials);
        let diss = self.model.total(&partials);

        let linear = diss.is_finite().then_some(diss);
        let log10 = linear.map(f32::log10).filter(|v| v.is_finite());
        let outcome = if linear.is_some() && log10.is_some() {
            BlockOutcome::Ok
        } else {
            tracing::debug!(dissonance = diss, "dropping non-finite dissonance value");
            BlockOutcome::NonFinite
        };

        BlockAnalysis {
            linear,
            log10,
            partials,
            smoothed,
            outcome,
        }
    }

    /// Clears the smoother's delay line.
    pub fn reset(&mut self) {
        self.smoother.reset();
    }
}
