//! Stream constraints and the configuration file format.
//!
//! Constraints are preferences, not requirements: a backend picks the
//! closest mode the device supports and reports what it negotiated in
//! the track settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted frame edge in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing, towards the user.
    #[default]
    User,
    /// Rear-facing.
    Environment,
}

/// Constraints passed to [`Camera::request_stream`](super::Camera::request_stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConstraints {
    /// Camera device index.
    pub device_index: u32,
    /// Preferred facing mode.
    pub facing_mode: FacingMode,
    /// Ideal frame width in pixels.
    pub ideal_width: u32,
    /// Ideal frame height in pixels.
    pub ideal_height: u32,
    /// Target frames per second.
    pub frame_rate: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            device_index: 0,
            facing_mode: FacingMode::User,
            ideal_width: 1280,
            ideal_height: 720,
            frame_rate: 30,
        }
    }
}

impl StreamConstraints {
    /// Creates constraints with the specified ideal dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            ideal_width: width,
            ideal_height: height,
            ..Default::default()
        }
    }

    /// Validates the constraint values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |edge: u32| (1..=MAX_DIMENSION).contains(&edge);
        if !in_range(self.ideal_width) || !in_range(self.ideal_height) {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.frame_rate == 0 || self.frame_rate > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions (each edge must be 1-8192 px)")]
    InvalidDimensions,
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("filename prefix must be non-empty and contain no path separators")]
    InvalidPrefix,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub camera: StreamConstraints,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Preview surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether the surface may start playback without a user gesture.
    pub autoplay: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { autoplay: true }
    }
}

/// Photo export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory downloads are written into.
    pub output_dir: PathBuf,
    /// Filename prefix, followed by `-<epoch millis>.png`.
    pub filename_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            filename_prefix: "photobooth".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.filename_prefix;
        if prefix.is_empty() || prefix.contains('/') || prefix.contains('\\') {
            return Err(ConfigError::InvalidPrefix);
        }
        Ok(())
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Metrics server port (0 to disable).
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { port: 0 }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.camera.validate()?;
        config.export.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constraints() {
        let constraints = StreamConstraints::default();
        assert!(constraints.validate().is_ok());
        assert_eq!(constraints.facing_mode, FacingMode::User);
        assert_eq!((constraints.ideal_width, constraints.ideal_height), (1280, 720));
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let constraints = StreamConstraints::with_dimensions(0, 720);
        assert!(matches!(
            constraints.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_oversized_dimensions_invalid() {
        let constraints = StreamConstraints::with_dimensions(MAX_DIMENSION + 1, 720);
        assert!(matches!(
            constraints.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
        assert!(StreamConstraints::with_dimensions(MAX_DIMENSION, MAX_DIMENSION)
            .validate()
            .is_ok());
        assert!(matches!(
            FileConfig::from_toml("[camera]\nideal_width = 4294967295\n"),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.camera, StreamConstraints::default());
        assert!(config.preview.autoplay);
        assert_eq!(config.export.filename_prefix, "photobooth");
        assert_eq!(config.metrics.port, 0);
    }

    #[test]
    fn test_partial_sections() {
        let config = FileConfig::from_toml(
            r#"
            [camera]
            facing_mode = "environment"
            ideal_width = 640
            ideal_height = 480

            [export]
            output_dir = "/tmp/shots"
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.facing_mode, FacingMode::Environment);
        assert_eq!(config.camera.ideal_width, 640);
        assert_eq!(config.camera.frame_rate, 30);
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(config.export.filename_prefix, "photobooth");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            FileConfig::from_toml("[camera]\nframe_rate = 0\n"),
            Err(ConfigError::InvalidFrameRate)
        ));
        assert!(matches!(
            FileConfig::from_toml("[export]\nfilename_prefix = \"a/b\"\n"),
            Err(ConfigError::InvalidPrefix)
        ));
        assert!(matches!(
            FileConfig::from_toml("[camera\n"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
