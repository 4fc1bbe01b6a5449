//! Polynomial root finding and root expansion.
//!
//! [`find_roots`] locates all complex roots of a polynomial with Laguerre's
//! method: each root is found from the origin, divided out of the working
//! polynomial (deflation), and the search repeats on the reduced degree.
//! An optional polish pass re-runs Laguerre on every root against the
//! undeflated polynomial to remove the error accumulated by deflation.
//!
//! [`expand_roots`] goes the other way, multiplying out `Π (z - r_k)`.
//!
//! Coefficient order differs between the two: `find_roots` takes ascending
//! powers (`c[k]` multiplies `z^k`), `expand_roots` returns descending powers
//! starting with the leading 1, which is the layout of a filter denominator.
//!
//! Reference: Press, Teukolsky, Vetterling, Flannery, "Numerical Recipes",
//! 2nd ed., §9.5.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;
use libm::{cos, sin};

use crate::complex::Complex;
use crate::error::RootError;

/// Relative convergence tolerance for a single Laguerre search.
const EPSS: f64 = 1.0e-7;

/// Number of fractional step sizes used to break limit cycles.
const MR: usize = 8;

/// Take a fractional step every `MT` iterations.
const MT: usize = 10;

/// Iteration budget for one root.
pub const MAX_ITERATIONS: usize = MT * MR;

/// Roots with `|im| <= 2 * EPS * |re|` are snapped onto the real axis.
const EPS: f64 = 2.0e-6;

/// Fractional steps applied on every `MT`-th iteration.
const FRAC: [f64; MR + 1] = [0.0, 0.5, 0.25, 0.75, 0.13, 0.38, 0.62, 0.88, 1.0];

/// Refines `x` towards a root of the polynomial `coeffs` (ascending powers).
///
/// Returns the root estimate and the number of iterations spent.
pub fn laguerre(coeffs: &[Complex], mut x: Complex) -> Result<(Complex, usize), RootError> {
    let m = coeffs.len().saturating_sub(1);
    if m == 0 {
        return Err(RootError::ZeroPolynomial);
    }
    let mf = m as f64;

    for iter in 1..=MAX_ITERATIONS {
        // Evaluate p(x), p'(x), p''(x)/2 with a bound on the rounding error
        let mut b = coeffs[m];
        let mut err = b.abs();
        let mut d = Complex::ZERO;
        let mut f = Complex::ZERO;
        let abx = x.abs();
        for j in (0..m).rev() {
            f = x * f + d;
            d = x * d + b;
            b = x * b + coeffs[j];
            err = b.abs() + abx * err;
        }
        err *= EPSS;
        if b.abs() <= err {
            return Ok((x, iter));
        }

        let g = d / b;
        let g2 = g * g;
        let h = g2 - (f / b).scale(2.0);
        let sq = (h.scale(mf) - g2).scale(mf - 1.0).sqrt();
        let mut gp = g + sq;
        let gm = g - sq;
        let abp = gp.abs();
        let abm = gm.abs();
        if abp < abm {
            gp = gm;
        }

        let dx = if abp.max(abm) > 0.0 {
            Complex::real(mf) / gp
        } else {
            let t = iter as f64;
            Complex::new(cos(t), sin(t)).scale(1.0 + abx)
        };

        let x1 = x - dx;
        if x == x1 {
            return Ok((x, iter));
        }
        if iter % MT != 0 {
            x = x1;
        } else {
            x = x - dx.scale(FRAC[iter / MT]);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::warn!(
        iterations = MAX_ITERATIONS,
        "Laguerre iteration did not converge"
    );
    Err(RootError::NonConvergence {
        iterations: MAX_ITERATIONS,
    })
}

/// Finds all roots of the polynomial `coeffs` (ascending powers).
///
/// Leading zero coefficients are ignored. Roots that are real to within
/// tolerance come back with an exactly zero imaginary part. The result is
/// sorted by ascending real part.
pub fn find_roots(coeffs: &[Complex], polish: bool) -> Result<Vec<Complex>, RootError> {
    let degree = coeffs
        .iter()
        .rposition(|c| *c != Complex::ZERO)
        .ok_or(RootError::ZeroPolynomial)?;
    let poly = &coeffs[..=degree];

    let mut roots = vec![Complex::ZERO; degree];
    let mut work = poly.to_vec();

    for j in (1..=degree).rev() {
        let (mut x, _) = laguerre(&work[..=j], Complex::ZERO)?;
        if x.im.abs() <= 2.0 * EPS * x.re.abs() {
            x.im = 0.0;
        }
        roots[j - 1] = x;

        // Synthetic division by (z - x)
        let mut b = work[j];
        for jj in (0..j).rev() {
            let c = work[jj];
            work[jj] = b;
            b = x * b + c;
        }
    }

    if polish {
        for root in &mut roots {
            let (x, _) = laguerre(poly, *root)?;
            *root = x;
        }
    }

    roots.sort_by(|a, b| a.re.total_cmp(&b.re));
    Ok(roots)
}

/// Multiplies out `Π (z - r_k)`.
///
/// Returns `roots.len() + 1` coefficients in descending powers, the first of
/// which is always 1.
pub fn expand_roots(roots: &[Complex]) -> Vec<Complex> {
    let mut coeffs = vec![Complex::ZERO; roots.len() + 1];
    coeffs[0] = Complex::ONE;

    for (j, &root) in roots.iter().enumerate() {
        // Walk downwards so coeffs[k - 1] still holds the previous pass
        for k in (1..=j + 1).rev() {
            coeffs[k] = coeffs[k] - root * coeffs[k - 1];
        }
    }

    coeffs
}
