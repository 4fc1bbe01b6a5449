//! Analysis configuration stored as TOML.

use std::path::Path;

use dissona_analysis::fft::Window;
use dissona_analysis::stft::AnalysisSettings;
use dissona_analysis::{DEFAULT_PEAK_THRESHOLD, MAX_PARTIALS, PipelineOptions};
use dissona_core::{IirFilter, PoleFilter, SPECTRAL_LOWPASS_A, SPECTRAL_LOWPASS_B};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Settings for an offline dissonance analysis run.
///
/// Every field has a default, so a file only needs the keys it changes:
///
/// ```toml
/// block_size = 4096
/// step_size = 1024
/// window = "blackman-harris"
///
/// [nudge]
/// magnitude = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// FFT block size in samples. Must be even.
    pub block_size: usize,
    /// Hop between successive blocks in samples.
    pub step_size: usize,
    /// Window name (`hann`, `hamming`, `blackman`, `blackman-harris`,
    /// `rectangular`).
    pub window: String,
    /// Number of loudest partials that enter the roughness sum.
    pub max_partials: usize,
    /// Derivative threshold for peak picking.
    pub peak_threshold: f32,
    /// Custom spectral smoother. The built-in low-pass is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoother: Option<SmootherConfig>,
    /// Pole nudge applied by the pole inspection command.
    pub nudge: NudgeConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let settings = AnalysisSettings::default();
        Self {
            block_size: settings.block_size,
            step_size: settings.step_size,
            window: settings.window.name().to_string(),
            max_partials: MAX_PARTIALS,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            smoother: None,
            nudge: NudgeConfig::default(),
        }
    }
}

/// IIR coefficients for the spectral smoother.
///
/// `numerator` is `b0..bM`; `denominator` is `a1..aN` with the leading 1
/// implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmootherConfig {
    /// Feed-forward coefficients.
    pub numerator: Vec<f64>,
    /// Feedback coefficients, empty for an FIR smoother.
    #[serde(default)]
    pub denominator: Vec<f64>,
}

/// Pole nudge factors, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NudgeConfig {
    /// Positive pulls poles toward the unit circle, negative toward the origin.
    pub magnitude: f64,
    /// Positive raises pole angles, negative lowers them.
    pub phase: f64,
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 || self.block_size % 2 != 0 {
            return Err(ConfigError::invalid(
                "block_size",
                format!("must be a positive even number, got {}", self.block_size),
            ));
        }
        if self.step_size == 0 {
            return Err(ConfigError::invalid("step_size", "must be positive"));
        }
        self.window()?;
        if self.max_partials == 0 {
            return Err(ConfigError::invalid("max_partials", "must be positive"));
        }
        if !self.peak_threshold.is_finite() || self.peak_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "peak_threshold",
                format!("must be finite and non-negative, got {}", self.peak_threshold),
            ));
        }
        self.smoother_filter()?;
        check_factor("nudge.magnitude", self.nudge.magnitude)?;
        check_factor("nudge.phase", self.nudge.phase)?;
        Ok(())
    }

    /// The configured analysis window.
    pub fn window(&self) -> Result<Window, ConfigError> {
        self.window
            .parse::<Window>()
            .map_err(|e| ConfigError::invalid("window", e.to_string()))
    }

    /// Build the spectral smoother: the custom coefficients if present,
    /// otherwise the built-in low-pass.
    pub fn smoother_filter(&self) -> Result<IirFilter, ConfigError> {
        match &self.smoother {
            Some(s) => IirFilter::new(&s.numerator, &s.denominator)
                .map_err(|e| ConfigError::invalid("smoother", e.to_string())),
            None => Ok(IirFilter::spectral_lowpass()),
        }
    }

    /// Build a controllable-pole filter from the smoother coefficients.
    pub fn pole_filter(&self) -> Result<PoleFilter, ConfigError> {
        let result = match &self.smoother {
            Some(s) => PoleFilter::new(&s.numerator, &s.denominator),
            None => PoleFilter::new(&SPECTRAL_LOWPASS_B, &SPECTRAL_LOWPASS_A),
        };
        result.map_err(|e| ConfigError::invalid("smoother", e.to_string()))
    }

    /// Validate and convert into settings for the offline analysis driver.
    pub fn to_settings(&self) -> Result<AnalysisSettings, ConfigError> {
        self.validate()?;
        Ok(AnalysisSettings {
            block_size: self.block_size,
            step_size: self.step_size,
            window: self.window()?,
            options: PipelineOptions {
                peak_threshold: self.peak_threshold,
                max_partials: self.max_partials,
                smoother: self.smoother_filter()?,
                ..PipelineOptions::default()
            },
        })
    }
}

fn check_factor(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must lie in [-1, 1], got {value}"),
        ))
    }
}
