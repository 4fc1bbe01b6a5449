//! Dissona Core - IIR filtering with controllable poles
//!
//! This crate provides the filter engine underneath the dissona spectral
//! analysis tools. It has no allocation in the per-sample path and runs
//! without `std`.
//!
//! # Core Abstractions
//!
//! ## Filters
//!
//! - [`Filter`] - Per-sample / per-block processing contract
//! - [`IirFilter`] - Fixed-coefficient IIR filter on a circular delay line
//! - [`PoleFilter`] - IIR filter whose poles can be nudged in the z-plane
//!
//! ## Building Blocks
//!
//! - [`DelayLine`] - Ring buffer with "i samples ago" addressing
//! - [`Complex`], [`Polar`] - Overflow-safe complex arithmetic
//! - [`find_roots`], [`expand_roots`] - Laguerre root solver and its inverse
//!
//! # no_std Support
//!
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dissona-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use dissona_core::{Filter, IirFilter};
//!
//! let mut lp = IirFilter::spectral_lowpass();
//! let input = [1.0; 64];
//! let mut output = [0.0; 64];
//! lp.process_block(&input, &mut output);
//! ```
//!
//! # Logging
//!
//! Enable the `tracing` feature to get events for rejected filter orders and
//! pole solver failures.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod complex;
pub mod delay;
pub mod error;
pub mod filter;
pub mod pole_filter;
pub mod roots;

// Re-export main types at crate root
pub use complex::{Complex, Polar};
pub use delay::DelayLine;
pub use error::{FilterError, RootError};
pub use filter::{
    Filter, IirFilter, MAX_POLES, MAX_ZEROS, SPECTRAL_LOWPASS_A, SPECTRAL_LOWPASS_B,
};
pub use pole_filter::{PoleFilter, REAL_POLE_EPSILON};
pub use roots::{MAX_ITERATIONS, expand_roots, find_roots, laguerre};
