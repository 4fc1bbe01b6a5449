//! Spectral peak picking on the magnitude derivative.

/// Default derivative threshold.
pub const DEFAULT_PEAK_THRESHOLD: f32 = 1e-9;

/// Finds local maxima as rising-to-falling zero crossings of the first
/// difference `d[i] = m[i + 1] - m[i]`.
///
/// Index `i` is a peak when `d[i - 1] > threshold` and `d[i] < -threshold`,
/// i.e. `m[i]` rises above its left neighbour and falls to its right one by
/// more than the threshold. The first and last entries are never peaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakPicker {
    /// Minimum slope magnitude on both sides of a peak.
    pub threshold: f32,
}

impl Default for PeakPicker {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PEAK_THRESHOLD,
        }
    }
}

impl PeakPicker {
    /// Creates a picker with the given threshold.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Indices of the peaks in `magnitudes`, ascending.
    pub fn detect(&self, magnitudes: &[f32]) -> Vec<usize> {
        let diffs = derivative(magnitudes);
        let th = self.threshold;

        (1..diffs.len())
            .filter(|&i| diffs[i - 1] > th && diffs[i] < -th)
            .collect()
    }
}

/// Forward first difference, one element shorter than `values`.
pub fn derivative(values: &[f32]) -> Vec<f32> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}
