//! Offline dissonance analysis of a whole signal.
//!
//! Plays the role of a frequency-domain plugin host: slices a mono signal
//! into overlapping blocks, windows and transforms each one, then feeds the
//! interleaved spectrum to a [`DissonanceAnalyzer`].
//!
//! Blocks start every `step_size` samples from 0 for as long as the start
//! lies inside the signal; the final blocks are zero-padded.

use crate::analyzer::DissonanceAnalyzer;
use crate::error::Result;
use crate::fft::{Fft, Window, to_interleaved};
use crate::pipeline::{BlockOutcome, PipelineOptions};

/// Framing and pipeline settings for [`analyze_signal`].
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Samples per block (even).
    pub block_size: usize,
    /// Samples between block starts.
    pub step_size: usize,
    /// Analysis window.
    pub window: Window,
    /// Per-block pipeline options.
    pub options: PipelineOptions,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            block_size: 2048,
            step_size: 1024,
            window: Window::Hann,
            options: PipelineOptions::default(),
        }
    }
}

impl AnalysisSettings {
    /// Number of blocks a signal of `len` samples produces.
    pub fn frame_count(&self, len: usize) -> usize {
        if self.step_size == 0 {
            return 0;
        }
        len.div_ceil(self.step_size)
    }
}

/// Features of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFeatures {
    /// Block index.
    pub index: usize,
    /// Start of the block in seconds.
    pub time: f64,
    /// Linear dissonance, if finite.
    pub linear: Option<f32>,
    /// Log10 dissonance, if finite.
    pub log10: Option<f32>,
    /// Number of partials that entered the sum.
    pub partials: usize,
    /// Block classification.
    pub outcome: BlockOutcome,
}

/// Analyses `samples` block by block.
pub fn analyze_signal(
    samples: &[f32],
    sample_rate: f32,
    settings: &AnalysisSettings,
) -> Result<Vec<FrameFeatures>> {
    analyze_signal_with_progress(samples, sample_rate, settings, |_, _| {})
}

/// [`analyze_signal`] with a callback receiving `(frames_done, frames_total)`
/// after every block.
pub fn analyze_signal_with_progress<P>(
    samples: &[f32],
    sample_rate: f32,
    settings: &AnalysisSettings,
    mut progress: P,
) -> Result<Vec<FrameFeatures>>
where
    P: FnMut(usize, usize),
{
    let mut analyzer = DissonanceAnalyzer::with_options(sample_rate, settings.options.clone());
    analyzer.initialise(1, settings.step_size, settings.block_size)?;

    let fft = Fft::new(settings.block_size);
    let window = settings.window.coefficients(settings.block_size);
    let total = settings.frame_count(samples.len());

    tracing::info!(
        samples = samples.len(),
        sample_rate,
        block_size = settings.block_size,
        step_size = settings.step_size,
        window = %settings.window,
        frames = total,
        "analyzing signal"
    );

    let mut frames = Vec::with_capacity(total);
    let mut block = vec![0.0f32; settings.block_size];

    for index in 0..total {
        let start = index * settings.step_size;
        let end = (start + settings.block_size).min(samples.len());

        block.fill(0.0);
        block[..end - start].copy_from_slice(&samples[start..end]);
        for (s, w) in block.iter_mut().zip(&window) {
            *s *= w;
        }

        let spectrum = to_interleaved(&fft.forward(&block));
        if let Some(result) = analyzer.analyze(&spectrum) {
            frames.push(FrameFeatures {
                index,
                time: start as f64 / sample_rate as f64,
                linear: result.linear,
                log10: result.log10,
                partials: result.partials.len(),
                outcome: result.outcome,
            });
        }
        progress(index + 1, total);
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn test_frame_count_covers_signal() {
        let s = AnalysisSettings::default();
        assert_eq!(s.frame_count(0), 0);
        assert_eq!(s.frame_count(1), 1);
        assert_eq!(s.frame_count(1024), 1);
        assert_eq!(s.frame_count(1025), 2);
    }

    #[test]
    fn test_silence_yields_degenerate_frames() {
        let frames = analyze_signal(&[0.0; 4096], 44100.0, &AnalysisSettings::default()).unwrap();
        assert_eq!(frames.len(), 4);
        for f in &frames {
            assert_eq!(f.outcome, BlockOutcome::NoPeaks);
            assert_eq!(f.linear, Some(0.0));
        }
        assert!((frames[1].time - 1024.0 / 44100.0).abs() < 1e-12);
    }

    #[test]
    fn test_progress_reports_every_frame() {
        let mut calls = Vec::new();
        analyze_signal_with_progress(
            &[0.0; 3000],
            8000.0,
            &AnalysisSettings::default(),
            |done, total| calls.push((done, total)),
        )
        .unwrap();
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_invalid_block_size_is_an_error() {
        let settings = AnalysisSettings {
            block_size: 1001,
            ..AnalysisSettings::default()
        };
        assert_eq!(
            analyze_signal(&[0.0; 10], 44100.0, &settings),
            Err(AnalysisError::BlockSize(1001))
        );
    }
}
