//! General-purpose IIR filter with a circular delay line.
//!
//! Implements the rational difference equation
//!
//! ```text
//! y[n] = b0*x[n] + b1*x[n-1] + ... + bM*x[n-M]
//!                - a1*y[n-1] - ... - aN*y[n-N]
//! ```
//!
//! with system function
//!
//! ```text
//!         b0 + b1 z^-1 + ... + bM z^-M
//! H(z) = ------------------------------
//!          1 + a1 z^-1 + ... + aN z^-N
//! ```
//!
//! This matches `scipy.signal.lfilter` / MATLAB `filter` for a normalized
//! denominator. Evaluation runs a single shared delay line: each step computes
//! the recursive ("pole") signal `w[n] = x[n] - Σ a_k w[n-k]`, emits
//! `y[n] = b0*w[n] + Σ b_k w[n-k]`, then pushes `w[n]` into the ring.
//!
//! # Limits
//!
//! Orders are capped at [`MAX_ZEROS`] zeros (51 numerator coefficients) and
//! [`MAX_POLES`] poles. Requests outside the range fail at construction time.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use crate::delay::DelayLine;
use crate::error::FilterError;

/// Maximum number of zeros (numerator order). The numerator holds up to
/// `MAX_ZEROS + 1` coefficients.
pub const MAX_ZEROS: usize = 50;

/// Maximum number of poles (denominator order, leading 1 excluded).
pub const MAX_POLES: usize = 50;

/// Numerator of the built-in spectral smoother: 10th-order Butterworth
/// low-pass, cutoff 0.25 of Nyquist.
pub const SPECTRAL_LOWPASS_B: [f64; 11] = [
    1.10559099e-05,
    1.10559099e-04,
    4.97515946e-04,
    1.32670919e-03,
    2.32174108e-03,
    2.78608930e-03,
    2.32174108e-03,
    1.32670919e-03,
    4.97515946e-04,
    1.10559099e-04,
    1.10559099e-05,
];

/// Denominator of the built-in spectral smoother, leading 1 omitted.
pub const SPECTRAL_LOWPASS_A: [f64; 10] = [
    -4.98698526e+00,
    1.19364368e+01,
    -1.77423718e+01,
    1.79732280e+01,
    -1.28862417e+01,
    6.59320221e+00,
    -2.36909169e+00,
    5.70632706e-01,
    -8.30176785e-02,
    5.52971437e-03,
];

/// Common interface for the filters in this crate.
///
/// Mirrors a per-sample processing contract: `process` advances the filter
/// state by one sample, the block methods repeat it.
pub trait Filter {
    /// Process a single sample.
    fn process(&mut self, input: f64) -> f64;

    /// Process a block of samples.
    ///
    /// # Panics
    /// Debug builds panic if `input.len() != output.len()`.
    fn process_block(&mut self, input: &[f64], output: &mut [f64]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the filter history without touching coefficients.
    fn reset(&mut self);
}

/// Fixed-coefficient IIR filter.
///
/// # Invariants
///
/// - `numerator.len()` is in `1..=MAX_ZEROS + 1`
/// - `denominator.len()` is in `0..=MAX_POLES` (the leading 1 is implicit)
/// - the delay line holds `max(numerator.len() - 1, denominator.len())`
///   samples and is owned exclusively by this instance
///
/// # Example
///
/// ```rust
/// use dissona_core::{Filter, IirFilter};
///
/// // y[n] = 0.5 x[n] - 0.5 y[n-1]
/// let mut f = IirFilter::new(&[0.5], &[0.5]).unwrap();
/// assert_eq!(f.process(1.0), 0.5);
/// assert_eq!(f.process(0.0), -0.25);
/// ```
#[derive(Debug, Clone)]
pub struct IirFilter {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
    delay: DelayLine,
}

impl IirFilter {
    /// Creates a filter from numerator `[b0, b1, ...]` and denominator
    /// `[a1, a2, ...]` (leading `a0 = 1` omitted).
    pub fn new(numerator: &[f64], denominator: &[f64]) -> Result<Self, FilterError> {
        validate_order(numerator.len(), denominator.len())?;
        if let Some(idx) = numerator
            .iter()
            .chain(denominator.iter())
            .position(|c| !c.is_finite())
        {
            return Err(FilterError::NonFiniteCoefficient(idx));
        }
        Ok(Self::from_parts(numerator.to_vec(), denominator.to_vec()))
    }

    /// Creates a filter from the packed coefficient layout: `num_len`
    /// numerator coefficients followed by `den_len` denominator coefficients
    /// (leading 1 omitted).
    pub fn from_packed(num_len: usize, den_len: usize, coeffs: &[f64]) -> Result<Self, FilterError> {
        validate_order(num_len, den_len)?;
        let expected = num_len + den_len;
        if coeffs.len() < expected {
            return Err(FilterError::CoefficientCount {
                expected,
                found: coeffs.len(),
            });
        }
        Self::new(&coeffs[..num_len], &coeffs[num_len..expected])
    }

    /// The 10th-order Butterworth low-pass used to smooth magnitude spectra.
    pub fn spectral_lowpass() -> Self {
        Self::from_parts(SPECTRAL_LOWPASS_B.to_vec(), SPECTRAL_LOWPASS_A.to_vec())
    }

    fn from_parts(numerator: Vec<f64>, denominator: Vec<f64>) -> Self {
        let delay_len = (numerator.len() - 1).max(denominator.len());
        Self {
            numerator,
            denominator,
            delay: DelayLine::new(delay_len),
        }
    }

    /// Numerator coefficients `[b0, b1, ...]`.
    pub fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    /// Denominator coefficients `[a1, a2, ...]`.
    pub fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    /// Length of the delay line in samples.
    pub fn delay_len(&self) -> usize {
        self.delay.len()
    }

    /// Filter order (the larger of the zero and pole counts).
    pub fn order(&self) -> usize {
        self.delay.len()
    }

    /// Read-only view of the delay line.
    pub fn delay_line(&self) -> &DelayLine {
        &self.delay
    }

    /// Replaces the denominator in place, keeping the delay line.
    ///
    /// The new slice must have the same length as the current denominator.
    pub(crate) fn set_denominator(&mut self, denominator: &[f64]) {
        debug_assert_eq!(denominator.len(), self.denominator.len());
        self.denominator.copy_from_slice(denominator);
    }
}

impl Filter for IirFilter {
    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        let b0 = self.numerator[0];
        let b = &self.numerator[1..];
        let a = &self.denominator;

        let mut pole = input;
        let mut zero = 0.0;

        for i in 0..self.delay.len() {
            let tap = self.delay.read(i as isize + 1);
            if i < a.len() {
                pole -= a[i] * tap;
            }
            if i < b.len() {
                zero += b[i] * tap;
            }
        }

        self.delay.insert(pole);
        b0 * pole + zero
    }

    fn reset(&mut self) {
        self.delay.clear();
    }
}

fn validate_order(num_len: usize, den_len: usize) -> Result<(), FilterError> {
    if !(1..=MAX_ZEROS + 1).contains(&num_len) || den_len > MAX_POLES {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            numerator = num_len,
            denominator = den_len,
            "filter order out of bounds"
        );
        return Err(FilterError::OrderOutOfBounds {
            numerator: num_len,
            denominator: den_len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct evaluation of the difference equation with explicit x/y histories.
    fn reference(b: &[f64], a: &[f64], x: &[f64]) -> Vec<f64> {
        let mut y = alloc::vec![0.0; x.len()];
        for n in 0..x.len() {
            let mut acc = 0.0;
            for (k, &bk) in b.iter().enumerate() {
                if n >= k {
                    acc += bk * x[n - k];
                }
            }
            for (k, &ak) in a.iter().enumerate() {
                if n > k {
                    acc -= ak * y[n - k - 1];
                }
            }
            y[n] = acc;
        }
        y
    }

    fn impulse(len: usize) -> Vec<f64> {
        let mut x = alloc::vec![0.0; len];
        x[0] = 1.0;
        x
    }

    #[test]
    fn test_one_pole_impulse_response() {
        // b = [0.5], a = [0.5]: h[n] = 0.5 * (-0.5)^n
        let mut filter = IirFilter::new(&[0.5], &[0.5]).unwrap();
        let x = impulse(8);
        let mut y = alloc::vec![0.0; 8];
        filter.process_block(&x, &mut y);

        let mut expected = 0.5;
        for &v in &y {
            assert!((v - expected).abs() < 1e-15, "got {v}, expected {expected}");
            expected *= -0.5;
        }
    }

    #[test]
    fn test_matches_reference_difference_equation() {
        let b = [0.2, 0.3, -0.1, 0.05];
        let a = [-0.4, 0.1];
        let x: Vec<f64> = (0..64).map(|n| libm::sin(n as f64 * 0.37) + 0.1).collect();

        let mut filter = IirFilter::new(&b, &a).unwrap();
        let mut y = alloc::vec![0.0; x.len()];
        filter.process_block(&x, &mut y);

        let expected = reference(&b, &a, &x);
        for (n, (got, want)) in y.iter().zip(expected.iter()).enumerate() {
            assert!((got - want).abs() < 1e-12, "n={n}: {got} vs {want}");
        }
    }

    #[test]
    fn test_fir_only() {
        let b = [1.0, 2.0, 3.0];
        let mut filter = IirFilter::new(&b, &[]).unwrap();
        assert_eq!(filter.delay_len(), 2);
        let mut y = alloc::vec![0.0; 5];
        filter.process_block(&impulse(5), &mut y);
        assert_eq!(y, [1.0, 2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pure_gain_has_no_delay() {
        let mut filter = IirFilter::new(&[2.5], &[]).unwrap();
        assert_eq!(filter.delay_len(), 0);
        assert_eq!(filter.process(2.0), 5.0);
        assert_eq!(filter.process(-1.0), -2.5);
    }

    #[test]
    fn test_state_carries_across_blocks() {
        let b = [0.1, 0.2];
        let a = [-0.5];
        let x: Vec<f64> = (0..32).map(|n| (n % 5) as f64).collect();

        let mut whole = IirFilter::new(&b, &a).unwrap();
        let mut y_whole = alloc::vec![0.0; 32];
        whole.process_block(&x, &mut y_whole);

        let mut split = IirFilter::new(&b, &a).unwrap();
        let mut y_split = alloc::vec![0.0; 32];
        split.process_block(&x[..13], &mut y_split[..13]);
        split.process_block(&x[13..], &mut y_split[13..]);

        assert_eq!(y_whole, y_split);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut filter = IirFilter::new(&[0.5], &[0.5]).unwrap();
        let first = filter.process(1.0);
        filter.process(1.0);
        filter.reset();
        assert_eq!(filter.process(1.0), first);
        assert_eq!(filter.delay_len(), 1);
    }

    #[test]
    fn test_order_bounds() {
        assert!(IirFilter::new(&[], &[]).is_err());
        assert!(IirFilter::new(&[1.0; MAX_ZEROS + 2], &[]).is_err());
        assert!(IirFilter::new(&[1.0], &[0.0; MAX_POLES + 1]).is_err());
        assert!(IirFilter::new(&[1.0; MAX_ZEROS + 1], &[0.0; MAX_POLES]).is_ok());

        assert_eq!(
            IirFilter::new(&[1.0], &[0.0; 51]).unwrap_err(),
            FilterError::OrderOutOfBounds {
                numerator: 1,
                denominator: 51
            }
        );
    }

    #[test]
    fn test_non_finite_coefficient_rejected() {
        assert_eq!(
            IirFilter::new(&[1.0, f64::NAN], &[0.1]).unwrap_err(),
            FilterError::NonFiniteCoefficient(1)
        );
        assert_eq!(
            IirFilter::new(&[1.0], &[0.1, f64::INFINITY]).unwrap_err(),
            FilterError::NonFiniteCoefficient(2)
        );
    }

    #[test]
    fn test_from_packed() {
        let packed = [0.5, 0.25, -0.3];
        let filter = IirFilter::from_packed(2, 1, &packed).unwrap();
        assert_eq!(filter.numerator(), &[0.5, 0.25]);
        assert_eq!(filter.denominator(), &[-0.3]);

        assert_eq!(
            IirFilter::from_packed(2, 2, &packed).unwrap_err(),
            FilterError::CoefficientCount {
                expected: 4,
                found: 3
            }
        );
        assert!(matches!(
            IirFilter::from_packed(0, 1, &packed),
            Err(FilterError::OrderOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_spectral_lowpass_unity_dc_gain() {
        let mut filter = IirFilter::spectral_lowpass();
        assert_eq!(filter.order(), 10);

        let mut out = 0.0;
        for _ in 0..400 {
            out = filter.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "DC gain {out}");
    }
}
