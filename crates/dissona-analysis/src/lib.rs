//! Dissona Analysis - Spectral dissonance feature extraction
//!
//! This crate turns one block's spectrum into a psychoacoustic roughness
//! score:
//!
//! - [`frame`] - Magnitude/frequency view of an interleaved spectrum
//! - [`smoothing`] - Zero-phase spectral envelope smoothing
//! - [`peaks`] - Derivative zero-crossing peak picking
//! - [`partials`] - Dominant partial selection
//! - [`roughness`] - Sethares / Plomp-Levelt pairwise roughness
//! - [`pipeline`] - The per-block pipeline tying these together
//! - [`analyzer`] - Host lifecycle (initialise / process / reset) and features
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`stft`] - Offline whole-signal analysis
//!
//! ## Example
//!
//! ```rust
//! use dissona_analysis::stft::{AnalysisSettings, analyze_signal};
//!
//! let sr = 44100.0;
//! let signal: Vec<f32> = (0..8192)
//!     .map(|n| {
//!         let t = n as f32 / sr;
//!         (2.0 * std::f32::consts::PI * 440.0 * t).sin()
//!             + (2.0 * std::f32::consts::PI * 466.2 * t).sin()
//!     })
//!     .collect();
//!
//! let frames = analyze_signal(&signal, sr, &AnalysisSettings::default()).unwrap();
//! for f in &frames {
//!     println!("{:.3}s {:?}", f.time, f.linear);
//! }
//! ```

pub mod analyzer;
pub mod error;
pub mod fft;
pub mod frame;
pub mod partials;
pub mod peaks;
pub mod pipeline;
pub mod roughness;
pub mod smoothing;
pub mod stft;

pub use analyzer::{
    ANALYZER_INFO, AnalyzerInfo, AnalyzerState, DissonanceAnalyzer, Feature, FeatureSet,
    LINEAR_OUTPUT, LOG_OUTPUT, OutputDescriptor,
};
pub use error::{AnalysisError, Result};
pub use frame::SpectralFrame;
pub use partials::{MAX_PARTIALS, Partial, select_partials};
pub use peaks::{DEFAULT_PEAK_THRESHOLD, PeakPicker};
pub use pipeline::{BlockAnalysis, BlockOutcome, DissonancePipeline, PipelineOptions};
pub use roughness::RoughnessModel;
pub use smoothing::smooth_zero_phase;
