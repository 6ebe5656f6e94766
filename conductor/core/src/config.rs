//! TOML Configuration File Support
//!
//! Centralized configuration loading for Token Masq, supporting a TOML file
//! at `~/.config/token-masq/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [display]
//! effect = "scramble"        # or "reveal"
//! tick_ms = 16
//! show_info_on_start = false
//!
//! [scramble]
//! speed_ms = 60
//! factor = 24.0
//! glyphs = "01#░▒▓█"
//!
//! [reveal]
//! char_delay_ms = 15
//! char_duration_ms = 100
//! hold_ms = 1000
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{EasingFunction, RevealConfig, ScrambleConfig};

/// Environment variable selecting the output effect
pub const ENV_EFFECT: &str = "TOKEN_MASQ_EFFECT";
/// Environment variable for the animation frame interval
pub const ENV_TICK_MS: &str = "TOKEN_MASQ_TICK_MS";
/// Environment variable for the scramble speed
pub const ENV_SCRAMBLE_SPEED_MS: &str = "TOKEN_MASQ_SCRAMBLE_SPEED_MS";
/// Environment variable for the scramble factor
pub const ENV_SCRAMBLE_FACTOR: &str = "TOKEN_MASQ_SCRAMBLE_FACTOR";

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

/// How conversion results are animated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Glitch transition
    #[default]
    Scramble,
    /// Staggered fade-in
    Reveal,
}

impl FromStr for Effect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scramble" => Ok(Self::Scramble),
            "reveal" => Ok(Self::Reveal),
            other => Err(ConfigError::ValidationError(format!(
                "unknown effect '{other}' (expected 'scramble' or 'reveal')"
            ))),
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scramble => write!(f, "scramble"),
            Self::Reveal => write!(f, "reveal"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Display section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Result effect
    pub effect: Option<Effect>,
    /// Frame interval while animating, in milliseconds
    pub tick_ms: Option<u64>,
    /// Open the info overlay on startup
    pub show_info_on_start: Option<bool>,
}

/// Scramble section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrambleToml {
    /// Base time unit in milliseconds
    pub speed_ms: Option<u64>,
    /// Randomness spread
    pub factor: Option<f64>,
    /// Substitution glyphs
    pub glyphs: Option<String>,
}

/// Reveal section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealToml {
    /// Per-character delay in milliseconds
    pub char_delay_ms: Option<u64>,
    /// Per-character duration in milliseconds
    pub char_duration_ms: Option<u64>,
    /// In-progress window in milliseconds
    pub hold_ms: Option<u64>,
    /// Per-character curve (linear, ease_in, ease_out, ease_in_out)
    pub easing: Option<EasingFunction>,
}

/// Complete TOML configuration file structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MasqToml {
    /// Display settings
    pub display: DisplayToml,
    /// Scramble effect settings
    pub scramble: ScrambleToml,
    /// Reveal effect settings
    pub reveal: RevealToml,
}

// =============================================================================
// Unified Configuration
// =============================================================================

/// Upper bound for the scramble `factor`
pub const MAX_SCRAMBLE_FACTOR: f64 = 1000.0;

/// Upper bound for a single scramble cell window
pub const MAX_SCRAMBLE_WINDOW: Duration = Duration::from_secs(60);

/// Resolved configuration
#[derive(Clone, Debug)]
pub struct MasqConfig {
    /// Result effect
    pub effect: Effect,
    /// Frame interval while animating
    pub tick: Duration,
    /// Open the info overlay on startup
    pub show_info_on_start: bool,
    /// Scramble animator settings
    pub scramble: ScrambleConfig,
    /// Reveal animator settings
    pub reveal: RevealConfig,
    /// File the configuration was loaded from
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for MasqConfig {
    fn default() -> Self {
        Self {
            effect: Effect::default(),
            tick: Duration::from_millis(16), // ~60fps
            show_info_on_start: false,
            scramble: ScrambleConfig::default(),
            reveal: RevealConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl MasqConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick.is_zero() {
            return Err(ConfigError::ValidationError(
                "tick_ms must be greater than 0".to_string(),
            ));
        }
        if self.scramble.speed.is_zero() {
            return Err(ConfigError::ValidationError(
                "scramble speed_ms must be greater than 0".to_string(),
            ));
        }
        if !self.scramble.factor.is_finite()
            || !(0.0..=MAX_SCRAMBLE_FACTOR).contains(&self.scramble.factor)
        {
            return Err(ConfigError::ValidationError(format!(
                "scramble factor must be between 0 and {MAX_SCRAMBLE_FACTOR}, got {}",
                self.scramble.factor
            )));
        }
        // Longest possible cell window: speed * (2 + factor)
        let window = self.scramble.speed.as_secs_f64() * (2.0 + self.scramble.factor);
        if window > MAX_SCRAMBLE_WINDOW.as_secs_f64() {
            return Err(ConfigError::ValidationError(format!(
                "scramble speed_ms * (2 + factor) must not exceed {}ms",
                MAX_SCRAMBLE_WINDOW.as_millis()
            )));
        }
        if self.scramble.glyphs.is_empty() {
            return Err(ConfigError::ValidationError(
                "scramble glyphs must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/token-masq/config.toml` or
/// `~/.config/token-masq/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("token-masq").join("config.toml"))
}

/// Load configuration from the default path and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<MasqConfig, ConfigError> {
    load_config_from_path(default_config_path().as_deref())
}

/// Load configuration from a specific path and the environment
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the resulting
/// values are invalid.
pub fn load_config_from_path(path: Option<&Path>) -> Result<MasqConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<&Path>, env: F) -> Result<MasqConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Start with defaults
    let mut config = MasqConfig::default();

    // Try to load from file
    if let Some(config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let toml_config: MasqToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.to_path_buf());
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

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env);

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut MasqConfig, toml: &MasqToml) {
    // Display settings
    if let Some(effect) = toml.display.effect {
        config.effect = effect;
    }
    if let Some(tick) = toml.display.tick_ms {
        config.tick = Duration::from_millis(tick);
    }
    if let Some(show) = toml.display.show_info_on_start {
        config.show_info_on_start = show;
    }

    // Scramble settings
    if let Some(speed) = toml.scramble.speed_ms {
        config.scramble.speed = Duration::from_millis(speed);
    }
    if let Some(factor) = toml.scramble.factor {
        config.scramble.factor = factor;
    }
    if let Some(ref glyphs) = toml.scramble.glyphs {
        config.scramble.glyphs = glyphs.chars().collect();
    }

    // Reveal settings
    if let Some(delay) = toml.reveal.char_delay_ms {
        config.reveal.char_delay = Duration::from_millis(delay);
    }
    if let Some(duration) = toml.reveal.char_duration_ms {
        config.reveal.char_duration = Duration::from_millis(duration);
    }
    if let Some(hold) = toml.reveal.hold_ms {
        config.reveal.hold = Duration::from_millis(hold);
    }
    if let Some(easing) = toml.reveal.easing {
        config.reveal.easing = easing;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut MasqConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(effect) = env(ENV_EFFECT) {
        match effect.parse::<Effect>() {
            Ok(effect) => {
                config.effect = effect;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(var = ENV_EFFECT, error = %e, "Ignoring invalid value"),
        }
    }
    if let Some(tick) = env(ENV_TICK_MS) {
        if let Ok(ms) = tick.parse::<u64>() {
            config.tick = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(speed) = env(ENV_SCRAMBLE_SPEED_MS) {
        if let Ok(ms) = speed.parse::<u64>() {
            config.scramble.speed = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(factor) = env(ENV_SCRAMBLE_FACTOR) {
        if let Ok(factor) = factor.parse::<f64>() {
            config.scramble.factor = factor;
            config.source = ConfigSource::Env;
        }
    }
}

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

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = MasqConfig::default();

        assert_eq!(config.effect, Effect::Scramble);
        assert_eq!(config.tick, Duration::from_millis(16));
        assert!(!config.show_info_on_start);
        assert_eq!(config.scramble.speed, Duration::from_millis(60));
        assert!((config.scramble.factor - 24.0).abs() < f64::EPSILON);
        assert_eq!(config.reveal.hold, Duration::from_millis(1000));
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        // Depends on environment
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("token-masq"));
            assert!(p.to_string_lossy().ends_with("config.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[display]
effect = "reveal"
tick_ms = 33
show_info_on_start = true

[scramble]
speed_ms = 40
factor = 8.5
glyphs = "01"

[reveal]
char_delay_ms = 20
char_duration_ms = 150
hold_ms = 2000
easing = "ease_in_out"
"#,
        );

        let config = load_config_with_env(Some(file.path()), no_env).unwrap();

        assert_eq!(config.effect, Effect::Reveal);
        assert_eq!(config.tick, Duration::from_millis(33));
        assert!(config.show_info_on_start);
        assert_eq!(config.scramble.speed, Duration::from_millis(40));
        assert!((config.scramble.factor - 8.5).abs() < f64::EPSILON);
        assert_eq!(config.scramble.glyphs, vec!['0', '1']);
        assert_eq!(config.reveal.char_delay, Duration::from_millis(20));
        assert_eq!(config.reveal.char_duration, Duration::from_millis(150));
        assert_eq!(config.reveal.hold, Duration::from_millis(2000));
        assert_eq!(config.reveal.easing, EasingFunction::EaseInOut);
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_toml(
            r#"
[scramble]
factor = 4.0
"#,
        );

        let config = load_config_with_env(Some(file.path()), no_env).unwrap();

        assert!((config.scramble.factor - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.scramble.speed, Duration::from_millis(60));
        assert_eq!(config.effect, Effect::Scramble);
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = write_toml("");
        let config = load_config_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(config.effect, Effect::Scramble);
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = load_config_with_env(Some(&path), no_env).unwrap();

        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_toml("[display\neffect = ");
        let result = load_config_with_env(Some(file.path()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_easing_in_toml() {
        let file = write_toml("[reveal]\neasing = \"bounce\"\n");
        let result = load_config_with_env(Some(file.path()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_effect_in_toml() {
        let file = write_toml("[display]\neffect = \"sparkle\"\n");
        let result = load_config_with_env(Some(file.path()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_validation_errors() {
        for content in [
            "[scramble]\nspeed_ms = 0\n",
            "[scramble]\nfactor = -1.0\n",
            "[scramble]\nglyphs = \"\"\n",
            "[display]\ntick_ms = 0\n",
            "[scramble]\nfactor = 1e21\n",
            "[scramble]\nspeed_ms = 10000\nfactor = 24.0\n",
        ] {
            let file = write_toml(content);
            let result = load_config_with_env(Some(file.path()), no_env);
            assert!(
                matches!(result, Err(ConfigError::ValidationError(_))),
                "expected validation error for {content:?}"
            );
        }
    }

    // =========================================================================
    // Environment Override Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[display]\neffect = \"reveal\"\n[scramble]\nspeed_ms = 40\n");
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_EFFECT, "scramble"),
            (ENV_SCRAMBLE_SPEED_MS, "90"),
            (ENV_SCRAMBLE_FACTOR, "3.5"),
            (ENV_TICK_MS, "20"),
        ]);

        let config =
            load_config_with_env(Some(file.path()), |k| env.get(k).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(config.effect, Effect::Scramble);
        assert_eq!(config.scramble.speed, Duration::from_millis(90));
        assert!((config.scramble.factor - 3.5).abs() < f64::EPSILON);
        assert_eq!(config.tick, Duration::from_millis(20));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_huge_env_factor_rejected() {
        let env: HashMap<&str, &str> = HashMap::from([(ENV_SCRAMBLE_FACTOR, "1e21")]);

        let result = load_config_with_env(None, |k| env.get(k).map(|v| v.to_string()));

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_largest_valid_factor_accepted() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SCRAMBLE_SPEED_MS, "50"),
            (ENV_SCRAMBLE_FACTOR, "1000"),
        ]);

        let config = load_config_with_env(None, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert!((config.scramble.factor - MAX_SCRAMBLE_FACTOR).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_EFFECT, "sparkle"), (ENV_SCRAMBLE_SPEED_MS, "fast")]);

        let config = load_config_with_env(None, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.effect, Effect::Scramble);
        assert_eq!(config.scramble.speed, Duration::from_millis(60));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_effect_from_str() {
        assert_eq!("Reveal".parse::<Effect>().unwrap(), Effect::Reveal);
        assert_eq!(" scramble ".parse::<Effect>().unwrap(), Effect::Scramble);
        assert!("glitter".parse::<Effect>().is_err());
        assert_eq!(Effect::Reveal.to_string(), "reveal");
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}
