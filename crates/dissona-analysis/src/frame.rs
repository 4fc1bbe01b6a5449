//! Magnitude/frequency view of one analysis block.

/// Bins `1..=N/2` of one block's spectrum.
///
/// Entry `k` describes FFT bin `k + 1`; DC is skipped. Magnitudes are
/// normalised by `N/2` so a full-scale sinusoid centred on a bin reads 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralFrame {
    frequencies: Vec<f32>,
    magnitudes: Vec<f32>,
}

impl SpectralFrame {
    /// Builds a frame from an interleaved `[re, im, ...]` spectrum.
    ///
    /// Hosts deliver either `block_size` or `block_size + 2` values (the
    /// latter includes the Nyquist pair). Bins whose pair lies beyond the end
    /// of `spectrum` read as zero.
    pub fn from_interleaved(spectrum: &[f32], block_size: usize, sample_rate: f32) -> Self {
        let half = block_size / 2;
        let norm = half.max(1) as f64;
        let mut frequencies = Vec::with_capacity(half);
        let mut magnitudes = Vec::with_capacity(half);

        for bin in 1..=half {
            let re = spectrum.get(bin * 2).copied().unwrap_or(0.0) as f64;
            let im = spectrum.get(bin * 2 + 1).copied().unwrap_or(0.0) as f64;
            frequencies.push((bin as f64 * sample_rate as f64 / block_size as f64) as f32);
            magnitudes.push(((re * re + im * im).sqrt() / norm) as f32);
        }

        Self {
            frequencies,
            magnitudes,
        }
    }

    /// Number of bins in the frame (`N/2`).
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// `true` for a zero-sized block.
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Bin centre frequencies in Hz, ascending.
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Normalised bin magnitudes.
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// `(frequency, magnitude)` of entry `index`.
    pub fn get(&self, index: usize) -> Option<(f32, f32)> {
        Some((*self.frequencies.get(index)?, *self.magnitudes.get(index)?))
    }
}
