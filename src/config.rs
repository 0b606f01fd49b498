//! Configuration for the Gesture Sensor Agent.
//!
//! Every detector threshold is a construction-time parameter. The defaults
//! reproduce the tuned values of the handset application; tests build
//! configs with compressed windows instead.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Shake gesture thresholds
    #[serde(default)]
    pub shake: ShakeConfig,

    /// Face-down gesture thresholds
    #[serde(default)]
    pub tilt: TiltConfig,

    /// Sample source settings
    #[serde(default)]
    pub source: SourceConfig,
}

/// Shake detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Minimum combined-axis delta that counts as a direction change
    pub min_movement: f32,
    /// Direction changes required before a shake can fire
    pub min_direction_changes: u32,
    /// Longest allowed gap between direction changes
    pub max_pause_ms: u64,
    /// Shortest gesture duration, first change to firing sample
    pub min_duration_ms: u64,
    /// Cooldown after a fired shake
    pub min_time_between_shakes_ms: u64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            min_movement: 15.0,
            min_direction_changes: 6,
            max_pause_ms: 500,
            min_duration_ms: 500,
            min_time_between_shakes_ms: 1500,
        }
    }
}

impl ShakeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_movement.is_finite() && self.min_movement >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "shake.min_movement must be a non-negative number, got {}",
                self.min_movement
            )));
        }
        if self.min_direction_changes == 0 {
            return Err(ConfigError::Invalid(
                "shake.min_direction_changes must be at least 1".to_string(),
            ));
        }
        if self.max_pause_ms == 0 {
            return Err(ConfigError::Invalid(
                "shake.max_pause_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tilt (face-down) detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Roll magnitude beyond which the device counts as face-down
    pub min_roll_degrees: f32,
    /// Dwell time the roll must stay beyond the threshold
    pub min_face_down_ms: u64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            min_roll_degrees: 155.0,
            min_face_down_ms: 1500,
        }
    }
}

impl TiltConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_roll_degrees.is_finite() && (0.0..180.0).contains(&self.min_roll_degrees)) {
            return Err(ConfigError::Invalid(format!(
                "tilt.min_roll_degrees must be in [0, 180), got {}",
                self.min_roll_degrees
            )));
        }
        Ok(())
    }
}

/// Sample source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Capacity of the collector-to-engine channel
    pub channel_capacity: usize,
    /// Replay traces at their recorded pace
    pub realtime: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            realtime: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, falling back to defaults if it does
    /// not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gesture-sensor-agent")
            .join("config.json")
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shake.validate()?;
        self.tilt.validate()?;
        if self.source.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "source.channel_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.shake.min_movement, 15.0);
        assert_eq!(config.shake.min_direction_changes, 6);
        assert_eq!(config.shake.max_pause_ms, 500);
        assert_eq!(config.shake.min_duration_ms, 500);
        assert_eq!(config.shake.min_time_between_shakes_ms, 1500);
        assert_eq!(config.tilt.min_roll_degrees, 155.0);
        assert_eq!(config.tilt.min_face_down_ms, 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"shake":{"min_direction_changes":3}}"#).unwrap();
        assert_eq!(config.shake.min_direction_changes, 3);
        assert_eq!(config.shake.max_pause_ms, 500);
        assert_eq!(config.tilt, TiltConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.tilt.min_face_down_ms = 300;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.shake.min_direction_changes = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.tilt.min_roll_degrees = 200.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.shake.min_movement = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.channel_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"tilt":{"min_roll_degrees":-5.0}}"#).unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_default_location_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
        assert!(Config::config_path().starts_with(dir.path()));

        assert_eq!(Config::load().unwrap(), Config::default());

        let mut config = Config::default();
        config.shake.min_movement = 12.5;
        config.save().unwrap();
        assert_eq!(Config::load().unwrap(), config);
    }
}
