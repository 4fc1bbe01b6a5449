//! Complex arithmetic for z-plane pole manipulation.
//!
//! A small, `no_std`-friendly complex type used by the root solver and the
//! controllable-pole filter. Magnitude and division are computed with scaling
//! so that intermediate products never overflow, and the square root uses the
//! stable two-branch formulation for the principal root.
//!
//! # Types
//!
//! - [`Complex`] - Cartesian `re + j·im`
//! - [`Polar`] - Magnitude/phase form of the same number

use core::ops::{Add, Div, Mul, Neg, Sub};
use libm::{atan2, cos, sin, sqrt};

/// Complex number in Cartesian form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex {
    /// Real part
    pub re: f64,
    /// Imaginary part
    pub im: f64,
}

impl Complex {
    /// `0 + 0j`
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    /// `1 + 0j`
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    /// Creates a complex number from its real and imaginary parts.
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Creates a purely real complex number.
    #[inline]
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Multiplies both components by a real scalar.
    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self::new(k * self.re, k * self.im)
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Magnitude `|z|`.
    ///
    /// Computed as `max * sqrt(1 + (min/max)^2)` so that squaring a large
    /// component cannot overflow. Exact when either component is zero.
    pub fn abs(self) -> f64 {
        let x = self.re.abs();
        let y = self.im.abs();
        if x == 0.0 {
            y
        } else if y == 0.0 {
            x
        } else if x > y {
            let t = y / x;
            x * sqrt(1.0 + t * t)
        } else {
            let t = x / y;
            y * sqrt(1.0 + t * t)
        }
    }

    /// Phase angle in radians, in `(-π, π]`.
    #[inline]
    pub fn arg(self) -> f64 {
        atan2(self.im, self.re)
    }

    /// Principal square root.
    ///
    /// The result always has a non-negative real part. `sqrt(0) = 0`.
    pub fn sqrt(self) -> Self {
        if self.re == 0.0 && self.im == 0.0 {
            return Self::ZERO;
        }

        let x = self.re.abs();
        let y = self.im.abs();
        let w = if x >= y {
            let r = y / x;
            sqrt(x) * sqrt(0.5 * (1.0 + sqrt(1.0 + r * r)))
        } else {
            let r = x / y;
            sqrt(y) * sqrt(0.5 * (r + sqrt(1.0 + r * r)))
        };

        if self.re >= 0.0 {
            Self::new(w, self.im / (2.0 * w))
        } else {
            let im = if self.im >= 0.0 { w } else { -w };
            Self::new(self.im / (2.0 * im), im)
        }
    }

    /// Converts to magnitude/phase form.
    #[inline]
    pub fn to_polar(self) -> Polar {
        Polar {
            mag: self.abs(),
            phase: self.arg(),
        }
    }

    /// Returns `true` if both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.im * rhs.re + self.re * rhs.im,
        )
    }
}

impl Div for Complex {
    type Output = Self;

    /// Smith's algorithm: scale by the larger divisor component.
    fn div(self, rhs: Self) -> Self {
        if rhs.re.abs() >= rhs.im.abs() {
            let r = rhs.im / rhs.re;
            let den = rhs.re + r * rhs.im;
            Self::new((self.re + r * self.im) / den, (self.im - r * self.re) / den)
        } else {
            let r = rhs.re / rhs.im;
            let den = rhs.im + r * rhs.re;
            Self::new((self.re * r + self.im) / den, (self.im * r - self.re) / den)
        }
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self::real(re)
    }
}

/// Complex number in magnitude/phase form.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Polar {
    /// Magnitude (distance from the origin)
    pub mag: f64,
    /// Phase in radians
    pub phase: f64,
}

impl Polar {
    /// Creates a polar value.
    pub const fn new(mag: f64, phase: f64) -> Self {
        Self { mag, phase }
    }

    /// Converts back to Cartesian form.
    #[inline]
    pub fn to_complex(self) -> Complex {
        Complex::new(self.mag * cos(self.phase), self.mag * sin(self.phase))
    }
}

impl From<Complex> for Polar {
    fn from(z: Complex) -> Self {
        z.to_polar()
    }
}

impl From<Polar> for Complex {
    fn from(p: Polar) -> Self {
        p.to_complex()
    }
}
