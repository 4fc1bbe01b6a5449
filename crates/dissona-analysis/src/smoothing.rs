//! Zero-phase spectral smoothing.
//!
//! Running a causal filter over a sequence, then again over the reversed
//! result, cancels its phase response: peaks in the smoothed envelope stay
//! at the bins they came from. The pass order here is backward first, then
//! forward.
//!
//! The filter's delay line is NOT cleared between the two passes, or between
//! calls. State left by the backward pass seeds the forward pass.

use dissona_core::Filter;

/// Smooths `magnitudes` with `filter` applied backward then forward.
///
/// Negative values in the result are clamped to zero, since the input is a
/// magnitude.
pub fn smooth_zero_phase<F: Filter + ?Sized>(filter: &mut F, magnitudes: &[f32]) -> Vec<f32> {
    let mut work: Vec<f64> = magnitudes.iter().rev().map(|&m| m as f64).collect();

    // Backward pass
    filter.process_block_inplace(&mut work);
    work.reverse();
    // Forward pass
    filter.process_block_inplace(&mut work);

    work.into_iter().map(|v| v.max(0.0) as f32).collect()
}
