//! Configuration for dissona analysis runs.
//!
//! Analysis settings live in a TOML file, by default
//! `<config dir>/dissona/analysis.toml`. Every key is optional; missing keys
//! take the library defaults.
//!
//! # Example
//!
//! ```rust
//! use dissona_config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_toml("block_size = 4096\nwindow = \"hamming\"").unwrap();
//! let settings = config.to_settings().unwrap();
//! assert_eq!(settings.block_size, 4096);
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
#[cfg(feature = "std")]
pub mod paths;

pub use config::{AnalysisConfig, NudgeConfig, SmootherConfig};
pub use error::ConfigError;
#[cfg(feature = "std")]
pub use paths::{default_config_path, user_config_dir};
