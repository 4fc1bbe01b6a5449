//! Error types for filter construction and pole solving.
//!
//! These are plain enums so the crate stays usable without `std`; with the
//! `std` feature they implement [`std::error::Error`].

use crate::filter::{MAX_POLES, MAX_ZEROS};

/// Errors raised while building a filter.
///
/// All variants are detected before any state is allocated, so a failed
/// constructor never leaves a partially built filter behind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Numerator length outside `[1, MAX_ZEROS + 1]` or denominator length
    /// outside `[0, MAX_POLES]`.
    OrderOutOfBounds {
        /// Requested numerator coefficient count.
        numerator: usize,
        /// Requested denominator coefficient count.
        denominator: usize,
    },
    /// The packed coefficient slice is shorter than the declared orders need.
    CoefficientCount {
        /// Number of coefficients required.
        expected: usize,
        /// Number of coefficients supplied.
        found: usize,
    },
    /// A coefficient is NaN or infinite.
    NonFiniteCoefficient(usize),
    /// The pole solver failed while deriving poles from the denominator.
    RootFinding(RootError),
}

/// Errors raised by the polynomial root solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootError {
    /// Laguerre iteration ran out of its iteration budget.
    NonConvergence {
        /// Iterations spent before giving up.
        iterations: usize,
    },
    /// The polynomial has no non-zero leading coefficient.
    ZeroPolynomial,
}

impl From<RootError> for FilterError {
    fn from(err: RootError) -> Self {
        Self::RootFinding(err)
    }
}

impl core::fmt::Display for FilterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OrderOutOfBounds {
                numerator,
                denominator,
            } => write!(
                f,
                "filter order out of bounds: numerator {numerator} (expected 1..={}), denominator {denominator} (expected 0..={})",
                MAX_ZEROS + 1,
                MAX_POLES
            ),
            Self::CoefficientCount { expected, found } => {
                write!(f, "expected {expected} coefficients, found {found}")
            }
            Self::NonFiniteCoefficient(idx) => write!(f, "coefficient {idx} is not finite"),
            Self::RootFinding(err) => write!(f, "pole solver failed: {err}"),
        }
    }
}

impl core::fmt::Display for RootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NonConvergence { iterations } => {
                write!(f, "root solver did not converge after {iterations} iterations")
            }
            Self::ZeroPolynomial => write!(f, "polynomial has no non-zero coefficients"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FilterError {}

#[cfg(feature = "std")]
impl std::error::Error for RootError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_display_names_limits() {
        let err = FilterError::OrderOutOfBounds {
            numerator: 52,
            denominator: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("numerator 52"), "got: {msg}");
        assert!(msg.contains("1..=51"), "got: {msg}");
        assert!(msg.contains("0..=50"), "got: {msg}");
    }

    #[test]
    fn root_error_wraps_into_filter_error() {
        let err: FilterError = RootError::NonConvergence { iterations: 80 }.into();
        assert_eq!(
            err,
            FilterError::RootFinding(RootError::NonConvergence { iterations: 80 })
        );
        assert!(err.to_string().contains("80 iterations"));
    }
}
