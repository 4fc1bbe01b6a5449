//! Sethares' parameterisation of the Plomp-Levelt roughness curve.
//!
//! For two pure tones at `f_low < f_high` with amplitude product `a`:
//!
//! ```text
//! S = D* / (s1 * f_low + s2)
//! d = a * (c1 * exp(b1 * S * Δf) + c2 * exp(b2 * S * Δf))
//! ```
//!
//! `S` stretches the curve so that maximum roughness falls at roughly a
//! quarter of a critical band, whatever the register.
//!
//! Reference: W. A. Sethares, "Local consonance and the relationship between
//! timbre and scale", JASA 94(3), 1993.

use crate::partials::Partial;

/// Curve constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoughnessModel {
    /// Fast exponential rate.
    pub b1: f32,
    /// Slow exponential rate.
    pub b2: f32,
    /// Critical band slope.
    pub s1: f32,
    /// Critical band offset.
    pub s2: f32,
    /// Weight of the `b1` term.
    pub c1: f32,
    /// Weight of the `b2` term.
    pub c2: f32,
    /// Point of maximum roughness.
    pub d_star: f32,
}

impl Default for RoughnessModel {
    fn default() -> Self {
        Self {
            b1: -3.51,
            b2: -5.75,
            s1: 0.0207,
            s2: 19.96,
            c1: 5.0,
            c2: -5.0,
            d_star: 0.24,
        }
    }
}

impl RoughnessModel {
    /// Roughness contributed by one pair of tones.
    #[inline]
    pub fn pair(&self, f_low: f32, f_high: f32, amp_product: f32) -> f32 {
        let s = self.d_star / (self.s1 * f_low + self.s2);
        let fdif = f_high - f_low;
        amp_product * (self.c1 * (self.b1 * s * fdif).exp() + self.c2 * (self.b2 * s * fdif).exp())
    }

    /// Sum over every pair of `partials`, which must be sorted by ascending
    /// frequency.
    pub fn total(&self, partials: &[Partial]) -> f32 {
        let mut diss = 0.0;
        for (i, lo) in partials.iter().enumerate() {
            for hi in &partials[i + 1..] {
                diss += self.pair(lo.frequency, hi.frequency, lo.magnitude * hi.magnitude);
            }
        }
        diss
    }
}
