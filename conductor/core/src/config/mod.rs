//! TOML Configuration File Support
//!
//! Centralized configuration loading for the duel, with an optional TOML
//! file at `~/.config/philosophical-duel/duel.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [choreography]
//! speed = 1.0
//!
//! [whiteboard]
//! width = 800
//! height = 500
//! default_stroke_width = 3
//! export_dir = "."
//!
//! [ui]
//! frame_ms = 50
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conductor::ConductorConfig;
use crate::whiteboard::STROKE_WIDTHS;

/// Largest accepted canvas edge in pixels
pub const MAX_CANVAS_EDGE: u32 = 4096;

/// Slowest accepted choreography speed
pub const MIN_SPEED: f64 = 0.01;

/// Fastest accepted choreography speed
pub const MAX_SPEED: f64 = 1000.0;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Choreography section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyToml {
    /// Timing scale (2.0 = twice as fast)
    pub speed: Option<f64>,
}

/// Whiteboard section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardToml {
    /// Canvas width in pixels
    pub width: Option<u32>,

    /// Canvas height in pixels
    pub height: Option<u32>,

    /// Initial stroke width
    pub default_stroke_width: Option<u32>,

    /// Directory that exported PNGs are written to
    pub export_dir: Option<PathBuf>,
}

/// UI section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToml {
    /// Frame interval in milliseconds
    pub frame_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelToml {
    /// Choreography section
    pub choreography: ChoreographyToml,

    /// Whiteboard section
    pub whiteboard: WhiteboardToml,

    /// UI section
    pub ui: UiToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Whiteboard settings
#[derive(Clone, Debug, PartialEq)]
pub struct WhiteboardSettings {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Initial stroke width
    pub default_stroke_width: u32,
    /// Export directory
    pub export_dir: PathBuf,
}

impl Default for WhiteboardSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            default_stroke_width: crate::whiteboard::DEFAULT_STROKE_WIDTH,
            export_dir: PathBuf::from("."),
        }
    }
}

/// Resolved configuration for the duel
///
/// Use [`load_config`] to load with proper priority handling.
#[derive(Clone, Debug)]
pub struct DuelConfig {
    /// Timing scale for the choreography
    pub speed: f64,

    /// Whiteboard settings
    pub whiteboard: WhiteboardSettings,

    /// Surface frame interval
    pub frame_interval: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            whiteboard: WhiteboardSettings::default(),
            frame_interval: Duration::from_millis(50),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl DuelConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Conductor settings derived from this configuration
    #[must_use]
    pub fn conductor_config(&self) -> ConductorConfig {
        ConductorConfig { speed: self.speed }
    }

    /// Check every value is in range
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(ConfigError::ValidationError(format!(
                "choreography.speed must be within {MIN_SPEED}..={MAX_SPEED}, got {}",
                self.speed
            )));
        }
        let wb = &self.whiteboard;
        for (name, edge) in [("width", wb.width), ("height", wb.height)] {
            if edge == 0 || edge > MAX_CANVAS_EDGE {
                return Err(ConfigError::ValidationError(format!(
                    "whiteboard.{name} must be within 1..={MAX_CANVAS_EDGE}, got {edge}"
                )));
            }
        }
        if !STROKE_WIDTHS.contains(&wb.default_stroke_width) {
            return Err(ConfigError::ValidationError(format!(
                "whiteboard.default_stroke_width must be one of {STROKE_WIDTHS:?}, got {}",
                wb.default_stroke_width
            )));
        }
        let frame_ms = self.frame_interval.as_millis();
        if !(10..=1000).contains(&frame_ms) {
            return Err(ConfigError::ValidationError(format!(
                "ui.frame_ms must be within 10..=1000, got {frame_ms}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/philosophical-duel/duel.toml` or
/// `~/.config/philosophical-duel/duel.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("philosophical-duel").join("duel.toml"))
}

/// Load configuration from the default path, then the environment
///
/// CLI overrides are not handled here; apply [`ConfigOverrides`] after,
/// then call [`DuelConfig::validate`].
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<DuelConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<DuelConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<DuelConfig, ConfigError> {
    let mut config = DuelConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: DuelToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Environment overrides file values
    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut DuelConfig, toml: &DuelToml) {
    if let Some(speed) = toml.choreography.speed {
        config.speed = speed;
    }

    if let Some(width) = toml.whiteboard.width {
        config.whiteboard.width = width;
    }
    if let Some(height) = toml.whiteboard.height {
        config.whiteboard.height = height;
    }
    if let Some(width) = toml.whiteboard.default_stroke_width {
        config.whiteboard.default_stroke_width = width;
    }
    if let Some(ref dir) = toml.whiteboard.export_dir {
        config.whiteboard.export_dir = dir.clone();
    }

    if let Some(ms) = toml.ui.frame_ms {
        config.frame_interval = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
///
/// Unparseable values are ignored with a warning.
fn apply_env_config(config: &mut DuelConfig, env: impl Fn(&str) -> Option<String>) {
    fn parsed<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
        let raw = raw?;
        match raw.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparseable environment value");
                None
            }
        }
    }

    if let Some(speed) = parsed::<f64>("DUEL_SPEED", env("DUEL_SPEED")) {
        config.speed = speed;
        config.source = ConfigSource::Env;
    }
    if let Some(dir) = env("DUEL_EXPORT_DIR") {
        config.whiteboard.export_dir = PathBuf::from(dir);
        config.source = ConfigSource::Env;
    }
    if let Some(width) = parsed::<u32>("DUEL_CANVAS_WIDTH", env("DUEL_CANVAS_WIDTH")) {
        config.whiteboard.width = width;
        config.source = ConfigSource::Env;
    }
    if let Some(height) = parsed::<u32>("DUEL_CANVAS_HEIGHT", env("DUEL_CANVAS_HEIGHT")) {
        config.whiteboard.height = height;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parsed::<u64>("DUEL_FRAME_MS", env("DUEL_FRAME_MS")) {
        config.frame_interval = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Timing scale override
    pub speed: Option<f64>,

    /// Export directory override
    pub export_dir: Option<PathBuf>,

    /// Canvas width override
    pub canvas_width: Option<u32>,

    /// Canvas height override
    pub canvas_height: Option<u32>,

    /// Frame interval override (milliseconds)
    pub frame_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timing scale override
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set export directory override
    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = Some(dir);
        self
    }

    /// Set canvas size override
    #[must_use]
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_width = Some(width);
        self.canvas_height = Some(height);
        self
    }

    /// Set frame interval override
    #[must_use]
    pub fn with_frame_ms(mut self, ms: u64) -> Self {
        self.frame_ms = Some(ms);
        self
    }

    fn is_empty(&self) -> bool {
        self.speed.is_none()
            && self.export_dir.is_none()
            && self.canvas_width.is_none()
            && self.canvas_height.is_none()
            && self.frame_ms.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut DuelConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(ref dir) = self.export_dir {
            config.whiteboard.export_dir = dir.clone();
        }
        if let Some(width) = self.canvas_width {
            config.whiteboard.width = width;
        }
        if let Some(height) = self.canvas_height {
            config.whiteboard.height = height;
        }
        if let Some(ms) = self.frame_ms {
            config.frame_interval = Duration::from_millis(ms);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = DuelConfig::default();

        assert_eq!(config.speed, 1.0);
        assert_eq!(config.whiteboard.width, 800);
        assert_eq!(config.whiteboard.height, 500);
        assert_eq!(config.whiteboard.default_stroke_width, 3);
        assert_eq!(config.whiteboard.export_dir, PathBuf::from("."));
        assert_eq!(config.frame_interval, Duration::from_millis(50));
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("philosophical-duel"));
            assert!(p.to_string_lossy().ends_with("duel.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = toml_file(
            r#"
[choreography]
speed = 2.5

[whiteboard]
width = 640
height = 480
default_stroke_width = 8
export_dir = "/tmp/sketches"

[ui]
frame_ms = 33
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.speed, 2.5);
        assert_eq!(config.whiteboard.width, 640);
        assert_eq!(config.whiteboard.height, 480);
        assert_eq!(config.whiteboard.default_stroke_width, 8);
        assert_eq!(config.whiteboard.export_dir, PathBuf::from("/tmp/sketches"));
        assert_eq!(config.frame_interval, Duration::from_millis(33));
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = toml_file("[whiteboard]\nheight = 300\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.whiteboard.height, 300);
        assert_eq!(config.whiteboard.width, 800);
        assert_eq!(config.speed, 1.0);
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = toml_file("");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.whiteboard, WhiteboardSettings::default());
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_graceful() {
        let config = load_config_with_env(
            Some(PathBuf::from("/nonexistent/philosophical-duel/duel.toml")),
            no_env,
        )
        .unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = toml_file("[choreography\nspeed = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    // =========================================================================
    // Priority Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("[choreography]\nspeed = 2.0\n[ui]\nframe_ms = 40\n");
        let env = env_of(&[("DUEL_SPEED", "4"), ("DUEL_EXPORT_DIR", "/srv/out")]);
        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.speed, 4.0);
        assert_eq!(config.whiteboard.export_dir, PathBuf::from("/srv/out"));
        assert_eq!(config.frame_interval, Duration::from_millis(40));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_unparseable_env_is_ignored() {
        let env = env_of(&[("DUEL_CANVAS_WIDTH", "wide"), ("DUEL_FRAME_MS", " 20 ")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.whiteboard.width, 800);
        assert_eq!(config.frame_interval, Duration::from_millis(20));
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_of(&[("DUEL_SPEED", "4"), ("DUEL_CANVAS_HEIGHT", "200")]);
        let mut config = load_config_with_env(None, env).unwrap();
        ConfigOverrides::new().with_speed(0.5).apply(&mut config);

        assert_eq!(config.speed, 0.5);
        assert_eq!(config.whiteboard.height, 200);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = DuelConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_config_overrides_builder() {
        let overrides = ConfigOverrides::new()
            .with_export_dir(PathBuf::from("out"))
            .with_canvas_size(320, 200)
            .with_frame_ms(16);
        let mut config = DuelConfig::default();
        overrides.apply(&mut config);

        assert_eq!(config.whiteboard.export_dir, PathBuf::from("out"));
        assert_eq!((config.whiteboard.width, config.whiteboard.height), (320, 200));
        assert_eq!(config.frame_interval, Duration::from_millis(16));
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_validation_rejects_out_of_range() {
        let cases: Vec<Box<dyn Fn(&mut DuelConfig)>> = vec![
            Box::new(|c| c.speed = 0.0),
            Box::new(|c| c.speed = f64::INFINITY),
            Box::new(|c| c.speed = f64::NAN),
            Box::new(|c| c.speed = 1e-20),
            Box::new(|c| c.speed = MAX_SPEED * 2.0),
            Box::new(|c| c.whiteboard.width = 0),
            Box::new(|c| c.whiteboard.height = MAX_CANVAS_EDGE + 1),
            Box::new(|c| c.whiteboard.default_stroke_width = 4),
            Box::new(|c| c.frame_interval = Duration::from_millis(5)),
        ];
        for mutate in cases {
            let mut config = DuelConfig::default();
            mutate(&mut config);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_validation_speed_bounds_inclusive() {
        for speed in [MIN_SPEED, 1.0, MAX_SPEED] {
            let mut config = DuelConfig::default();
            config.speed = speed;
            assert!(config.validate().is_ok(), "speed {speed} rejected");
        }
        let mut config = DuelConfig::default();
        config.speed = MIN_SPEED / 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_conductor_config_carries_speed() {
        let mut config = DuelConfig::default();
        config.speed = 3.0;
        assert_eq!(config.conductor_config().speed, 3.0);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError("invalid value".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: invalid value");
    }
}
