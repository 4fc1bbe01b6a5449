//! Error types for the analysis pipeline.

use dissona_core::FilterError;

/// Errors raised while configuring the dissonance analyzer.
///
/// Per-block conditions (no peaks, non-finite sums) are not errors; they are
/// reported through [`BlockOutcome`](crate::pipeline::BlockOutcome).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The analyzer only handles a single channel.
    #[error("unsupported channel count {0} (expected 1)")]
    ChannelCount(usize),

    /// Block size must be positive and even.
    #[error("invalid block size {0} (must be even and greater than zero)")]
    BlockSize(usize),

    /// Step size must be positive.
    #[error("invalid step size {0} (must be greater than zero)")]
    StepSize(usize),

    /// Sample rate must be positive and finite.
    #[error("invalid sample rate {0}")]
    SampleRate(f32),

    /// The smoothing filter could not be built.
    #[error("smoothing filter: {0}")]
    Filter(#[from] FilterError),
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
