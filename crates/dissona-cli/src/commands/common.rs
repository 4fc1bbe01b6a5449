//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use dissona_config::{AnalysisConfig, default_config_path};
use std::path::Path;

/// Load the analysis configuration.
///
/// Searches in this order:
/// 1. The explicit `--config` path (must exist)
/// 2. The user config file (`<config dir>/dissona/analysis.toml`)
/// 3. Built-in defaults
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    if let Some(path) = explicit {
        return AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }

    let user = default_config_path();
    if user.is_file() {
        tracing::info!(path = %user.display(), "using user config");
        return AnalysisConfig::load(&user)
            .with_context(|| format!("loading config {}", user.display()));
    }

    Ok(AnalysisConfig::default())
}
