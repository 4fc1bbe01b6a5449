//! IIR filter with directly controllable poles.
//!
//! [`PoleFilter`] starts from an ordinary coefficient design, solves for the
//! poles once, and then lets the caller move them at control rate:
//!
//! - **Magnitude nudge** pushes every complex pole towards the unit circle
//!   (longer ringing, sharper resonances) or towards the origin (shorter
//!   ringing) without changing where the resonances sit in frequency.
//! - **Phase nudge** rotates every complex pole, shifting the resonant
//!   frequencies up or down.
//!
//! Real poles (DC / Nyquist behaviour) never move. After a nudge the poles
//! are multiplied back out into a denominator and evaluation continues on the
//! same delay line, so pole motion never resets the filter history.
//!
//! ```text
//! designed a[]  --find_roots-->  poles (sorted by |p| desc)
//!                                   |
//!                     nudge(mag, phase) per block
//!                                   v
//!                 expand_roots --> a'[] --> IirFilter evaluation
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::complex::{Complex, Polar};
use crate::error::FilterError;
use crate::filter::{Filter, IirFilter};
use crate::roots::{expand_roots, find_roots};

/// Poles with `|im|` at or below this are treated as real and never nudged.
pub const REAL_POLE_EPSILON: f64 = 1e-6;

/// IIR filter whose denominator is driven by an explicit pole set.
///
/// # Invariants
///
/// - `base_poles` holds the roots of the designed denominator, sorted by
///   descending magnitude; it never changes after construction
/// - every nudge is applied relative to `base_poles`, so repeated calls with
///   the same factors are idempotent
/// - `poles` always matches the denominator currently installed in `filter`
///
/// # Example
///
/// ```rust
/// use dissona_core::{Filter, PoleFilter};
///
/// // Resonator with poles at 0.9 * e^{±j0.5}
/// let a1 = -2.0 * 0.9 * 0.5f64.cos();
/// let mut f = PoleFilter::new(&[1.0], &[a1, 0.81]).unwrap();
///
/// // Pull the poles halfway towards the origin
/// f.nudge(-0.5, 0.0);
/// assert!((f.poles()[0].abs() - 0.45).abs() < 1e-6);
/// let _ = f.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct PoleFilter {
    filter: IirFilter,
    designed: Vec<f64>,
    base_poles: Vec<Complex>,
    poles: Vec<Complex>,
}

impl PoleFilter {
    /// Builds the filter and solves for its poles.
    ///
    /// `denominator` omits the leading 1, exactly as for [`IirFilter::new`].
    pub fn new(numerator: &[f64], denominator: &[f64]) -> Result<Self, FilterError> {
        let filter = IirFilter::new(numerator, denominator)?;
        let base_poles = solve_poles(denominator)?;

        Ok(Self {
            filter,
            designed: denominator.to_vec(),
            poles: base_poles.clone(),
            base_poles,
        })
    }

    /// Current pole positions.
    pub fn poles(&self) -> &[Complex] {
        &self.poles
    }

    /// Poles of the designed denominator, largest magnitude first.
    pub fn base_poles(&self) -> &[Complex] {
        &self.base_poles
    }

    /// Denominator currently driving evaluation (leading 1 omitted).
    pub fn denominator(&self) -> &[f64] {
        self.filter.denominator()
    }

    /// Numerator coefficients.
    pub fn numerator(&self) -> &[f64] {
        self.filter.numerator()
    }

    /// The wrapped fixed-coefficient filter.
    pub fn inner(&self) -> &IirFilter {
        &self.filter
    }

    /// Moves the poles and re-derives the denominator.
    ///
    /// Both factors are expected in `[-1, 1]`; `0` and anything outside the
    /// range leave that aspect of the poles untouched.
    ///
    /// - `mag_factor > 0`: complex poles are scaled by
    ///   `1 + (1/|p_max| - 1) * mag_factor`, where `p_max` is the
    ///   largest-magnitude complex pole. At `1.0` that pole lands on the unit
    ///   circle.
    /// - `mag_factor < 0`: complex poles are scaled by `mag_factor + 1`. At
    ///   `-1.0` they collapse onto the origin.
    /// - `phase_factor > 0`: complex pole phases are scaled by
    ///   `1 + (1 - φ_max/π) * phase_factor`, where `φ_max` is the largest
    ///   phase among all poles.
    /// - `phase_factor < 0`: phases are scaled by `phase_factor + 1`.
    ///
    /// If the re-derived coefficients are not finite the previous denominator
    /// stays in place.
    pub fn nudge(&mut self, mag_factor: f64, phase_factor: f64) {
        let mut polar: Vec<Polar> = self.base_poles.iter().map(|p| p.to_polar()).collect();
        let moved_mag = nudge_magnitudes(&mut polar, &self.base_poles, mag_factor);
        let moved_phase = nudge_phases(&mut polar, &self.base_poles, phase_factor);

        if !moved_mag && !moved_phase {
            self.poles.copy_from_slice(&self.base_poles);
            self.filter.set_denominator(&self.designed);
            return;
        }

        let nudged: Vec<Complex> = polar.iter().map(|p| p.to_complex()).collect();
        let coeffs = expand_roots(&nudged);
        let denominator: Vec<f64> = coeffs[1..].iter().map(|c| c.re).collect();

        if denominator.iter().any(|c| !c.is_finite()) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                mag_factor,
                phase_factor,
                "nudged poles produced non-finite coefficients, keeping previous set"
            );
            return;
        }

        self.poles = nudged;
        self.filter.set_denominator(&denominator);
    }

    /// Nudges once, then filters a block: the control-rate / audio-rate split
    /// of a modulated resonator.
    pub fn process_block_nudged(
        &mut self,
        mag_factor: f64,
        phase_factor: f64,
        input: &[f64],
        output: &mut [f64],
    ) {
        self.nudge(mag_factor, phase_factor);
        self.filter.process_block(input, output);
    }
}

impl Filter for PoleFilter {
    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        self.filter.process(input)
    }

    fn process_block(&mut self, input: &[f64], output: &mut [f64]) {
        self.filter.process_block(input, output);
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

/// Roots of `z^N + a1 z^(N-1) + ... + aN`, sorted by descending magnitude.
fn solve_poles(denominator: &[f64]) -> Result<Vec<Complex>, FilterError> {
    if denominator.is_empty() {
        return Ok(Vec::new());
    }

    // Ascending powers: aN, ..., a1, 1
    let mut poly: Vec<Complex> = denominator.iter().rev().map(|&a| Complex::real(a)).collect();
    poly.push(Complex::ONE);

    let mut poles = find_roots(&poly, true).map_err(|err| {
        #[cfg(feature = "tracing")]
        tracing::warn!(%err, order = denominator.len(), "pole solver failed");
        FilterError::from(err)
    })?;
    poles.sort_by(|a, b| b.abs().total_cmp(&a.abs()));
    Ok(poles)
}

#[inline]
fn is_complex(p: Complex) -> bool {
    p.im.abs() > REAL_POLE_EPSILON
}

/// Returns `true` if any pole moved.
fn nudge_magnitudes(polar: &mut [Polar], poles: &[Complex], fact: f64) -> bool {
    let scale = if fact > 0.0 && fact <= 1.0 {
        // Poles are sorted, so the first complex one is the largest
        let Some(largest) = poles.iter().position(|&p| is_complex(p)) else {
            return false;
        };
        1.0 + (1.0 / polar[largest].mag - 1.0) * fact
    } else if (-1.0..0.0).contains(&fact) {
        fact + 1.0
    } else {
        return false;
    };

    let mut moved = false;
    for (pl, &p) in polar.iter_mut().zip(poles) {
        if is_complex(p) {
            pl.mag *= scale;
            moved = true;
        }
    }
    moved
}

/// Returns `true` if any pole moved.
fn nudge_phases(polar: &mut [Polar], poles: &[Complex], fact: f64) -> bool {
    let scale = if fact > 0.0 && fact <= 1.0 {
        let ph_max = polar.iter().map(|p| p.phase).fold(0.0, f64::max) / PI;
        1.0 + (1.0 - ph_max) * fact
    } else if (-1.0..0.0).contains(&fact) {
        fact + 1.0
    } else {
        return false;
    };

    let mut moved = false;
    for (pl, &p) in polar.iter_mut().zip(poles) {
        if is_complex(p) {
            pl.phase *= scale;
            moved = true;
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::cos;

    /// Conjugate pair at 0.9 e^{±j0.5} plus a real pole at 0.5.
    fn resonator() -> PoleFilter {
        let pair = [-2.0 * 0.9 * cos(0.5), 0.81];
        // (z^2 + p1 z + p2)(z - 0.5)
        let a = [pair[0] - 0.5, pair[1] - 0.5 * pair[0], -0.5 * pair[1]];
        PoleFilter::new(&[1.0], &a).unwrap()
    }

    #[test]
    fn test_poles_sorted_descending() {
        let f = resonator();
        let poles = f.base_poles();
        assert_eq!(poles.len(), 3);
        assert!((poles[0].abs() - 0.9).abs() < 1e-6);
        assert!((poles[1].abs() - 0.9).abs() < 1e-6);
        assert!((poles[2].re - 0.5).abs() < 1e-6);
        assert_eq!(poles[2].im, 0.0);
    }

    #[test]
    fn test_zero_factors_are_identity() {
        let mut f = resonator();
        let before_poles = f.poles().to_vec();
        let before_den = f.denominator().to_vec();
        f.nudge(0.0, 0.0);
        assert_eq!(f.poles(), &before_poles[..]);
        assert_eq!(f.denominator(), &before_den[..]);
    }

    #[test]
    fn test_out_of_range_factors_are_noop() {
        let mut f = resonator();
        let before = f.poles().to_vec();
        f.nudge(1.5, -1.01);
        assert_eq!(f.poles(), &before[..]);
        f.nudge(f64::NAN, 2.0);
        assert_eq!(f.poles(), &before[..]);
    }

    #[test]
    fn test_full_positive_nudge_reaches_unit_circle() {
        let mut f = resonator();
        f.nudge(1.0, 0.0);
        for p in &f.poles()[..2] {
            assert!((p.abs() - 1.0).abs() < 1e-6, "pole {p:?}");
        }
        // Real pole untouched
        assert!((f.poles()[2].re - 0.5).abs() < 1e-6);
        assert_eq!(f.poles()[2].im, 0.0);
    }

    #[test]
    fn test_negative_nudge_scales_towards_origin() {
        let mut f = resonator();
        f.nudge(-0.5, 0.0);
        for p in &f.poles()[..2] {
            assert!((p.abs() - 0.45).abs() < 1e-6);
            assert!((p.arg().abs() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_nudge_is_relative_to_design() {
        let mut once = resonator();
        once.nudge(-0.5, 0.0);
        let mut twice = resonator();
        twice.nudge(-0.5, 0.0);
        twice.nudge(-0.5, 0.0);
        for (a, b) in once.poles().iter().zip(twice.poles()) {
            assert!((*a - *b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_phase_nudge_keeps_conjugate_symmetry() {
        let mut f = resonator();
        f.nudge(0.0, 0.5);
        let expected = 0.5 * (1.0 + (1.0 - 0.5 / PI) * 0.5);
        let poles = f.poles();
        assert!((poles[0].arg().abs() - expected).abs() < 1e-6);
        assert!((poles[0].im + poles[1].im).abs() < 1e-6);
        assert!(f.denominator().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_rederived_coefficients_match_poles() {
        let mut f = resonator();
        f.nudge(-0.5, 0.0);
        // Pair at 0.45 e^{±j0.5}, real pole at 0.5
        let pair = [-2.0 * 0.45 * cos(0.5), 0.2025];
        let a = [pair[0] - 0.5, pair[1] - 0.5 * pair[0], -0.5 * pair[1]];
        for (got, want) in f.denominator().iter().zip(a.iter()) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn test_nudge_keeps_history() {
        let mut f = resonator();
        f.process(1.0);
        let cursor = f.inner().delay_line().cursor();
        f.nudge(0.5, 0.0);
        assert_eq!(f.inner().delay_line().cursor(), cursor);
        assert!(f.inner().delay_line().read(1) != 0.0);
    }

    #[test]
    fn test_all_real_poles_ignore_magnitude_nudge() {
        // (z - 0.5)(z + 0.25)
        let mut f = PoleFilter::new(&[1.0], &[-0.25, -0.125]).unwrap();
        let before = f.poles().to_vec();
        f.nudge(0.8, 0.8);
        assert_eq!(f.poles(), &before[..]);
    }

    #[test]
    fn test_pure_fir_has_no_poles() {
        let mut f = PoleFilter::new(&[0.5, 0.5], &[]).unwrap();
        assert!(f.poles().is_empty());
        f.nudge(1.0, 1.0);
        let mut out = [0.0; 3];
        f.process_block_nudged(0.5, 0.5, &[1.0, 0.0, 0.0], &mut out);
        assert_eq!(out, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_invalid_order_rejected() {
        assert!(matches!(
            PoleFilter::new(&[], &[0.5]),
            Err(FilterError::OrderOutOfBounds { .. })
        ));
    }
}
