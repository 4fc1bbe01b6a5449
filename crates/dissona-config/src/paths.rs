//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/dissona/`
//! - macOS: `~/Library/Application Support/dissona/`
//! - Windows: `%APPDATA%\dissona\`

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "dissona";

/// File name of the analysis configuration.
const CONFIG_FILE: &str = "analysis.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory when the platform has no config
/// directory.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the default analysis configuration file.
///
/// ```rust,no_run
/// use dissona_config::paths::default_config_path;
///
/// let path = default_config_path();
/// assert!(path.ends_with("dissona/analysis.toml"));
/// ```
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}
