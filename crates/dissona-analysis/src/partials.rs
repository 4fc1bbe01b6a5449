//! Dominant partial selection.

use crate::frame::SpectralFrame;

/// Default cap on partials per block.
pub const MAX_PARTIALS: usize = 20;

/// A spectral peak retained for the roughness sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Frequency in Hz.
    pub frequency: f32,
    /// Normalised magnitude.
    pub magnitude: f32,
}

impl Partial {
    /// Creates a partial.
    pub fn new(frequency: f32, magnitude: f32) -> Self {
        Self {
            frequency,
            magnitude,
        }
    }
}

/// Keeps the `max_partials` loudest peaks, returned in ascending frequency.
///
/// Peaks are ranked by magnitude, descending; equal magnitudes keep their
/// original index order. Indices outside the frame are ignored.
pub fn select_partials(frame: &SpectralFrame, peaks: &[usize], max_partials: usize) -> Vec<Partial> {
    let mut ranked: Vec<Partial> = peaks
        .iter()
        .filter_map(|&i| frame.get(i))
        .map(|(f, m)| Partial::new(f, m))
        .collect();

    // Stable sort keeps index order among ties
    ranked.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    ranked.truncate(max_partials);
    ranked.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
    ranked
}
