//! Timer configuration.
//!
//! Settings are read from `config.json` in the data directory. Every field
//! has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Directory name created under the home directory.
const DATA_DIR_NAME: &str = ".workout-timer";

fn default_prep_seconds() -> u32 {
    5
}

fn default_countdown_beeps() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

fn default_announce_delay_ms() -> u64 {
    500
}

fn default_tone_frequency_hz() -> u32 {
    880
}

fn default_tone_duration_ms() -> u64 {
    150
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("設定ファイルを読み込めません: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("設定ファイルの形式が不正です: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("設定値が不正です: {0}")]
    Invalid(String),
}

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Length of the preparation countdown in seconds (1-60)
    #[serde(default = "default_prep_seconds")]
    pub prep_seconds: u32,

    /// How many seconds before a transition the countdown tone plays (0-10)
    #[serde(default = "default_countdown_beeps")]
    pub countdown_beeps: u32,

    /// Whether tones are played
    #[serde(default = "default_true")]
    pub sound_enabled: bool,

    /// Whether phase names are spoken
    #[serde(default = "default_true")]
    pub speech_enabled: bool,

    /// Whether system notifications are posted
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    /// Delay between a transition and its spoken announcement
    #[serde(default = "default_announce_delay_ms")]
    pub announce_delay_ms: u64,

    /// Pitch of the built-in tone
    #[serde(default = "default_tone_frequency_hz")]
    pub tone_frequency_hz: u32,

    /// Length of the built-in tone
    #[serde(default = "default_tone_duration_ms")]
    pub tone_duration_ms: u64,

    /// Audio file played instead of the built-in tone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_file: Option<PathBuf>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            prep_seconds: default_prep_seconds(),
            countdown_beeps: default_countdown_beeps(),
            sound_enabled: true,
            speech_enabled: true,
            notifications_enabled: true,
            announce_delay_ms: default_announce_delay_ms(),
            tone_frequency_hz: default_tone_frequency_hz(),
            tone_duration_ms: default_tone_duration_ms(),
            tone_file: None,
        }
    }
}

impl TimerConfig {
    /// Sets the preparation countdown.
    #[must_use]
    pub fn with_prep_seconds(mut self, seconds: u32) -> Self {
        self.prep_seconds = seconds;
        self
    }

    /// Sets the number of countdown tones.
    #[must_use]
    pub fn with_countdown_beeps(mut self, beeps: u32) -> Self {
        self.countdown_beeps = beeps;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=60).contains(&self.prep_seconds) {
            return Err(ConfigError::Invalid(
                "準備時間は1-60秒の範囲で指定してください".to_string(),
            ));
        }
        if self.countdown_beeps > 10 {
            return Err(ConfigError::Invalid(
                "カウントダウン音は0-10回の範囲で指定してください".to_string(),
            ));
        }
        if !(20..=20_000).contains(&self.tone_frequency_hz) {
            return Err(ConfigError::Invalid(
                "トーン周波数は20-20000Hzの範囲で指定してください".to_string(),
            ));
        }
        if self.tone_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "トーンの長さは1ミリ秒以上で指定してください".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let bytes = fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }
}

/// Returns the default data directory (`~/.workout-timer`).
///
/// Falls back to a relative directory when the home directory is unknown.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimerConfig::default();

        assert_eq!(config.prep_seconds, 5);
        assert_eq!(config.countdown_beeps, 3);
        assert!(config.sound_enabled);
        assert!(config.speech_enabled);
        assert!(config.notifications_enabled);
        assert_eq!(config.announce_delay_ms, 500);
        assert!(config.tone_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = TimerConfig::default()
            .with_prep_seconds(10)
            .with_countdown_beeps(0);

        assert_eq!(config.prep_seconds, 10);
        assert_eq!(config.countdown_beeps, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_prep_seconds_range() {
        assert!(TimerConfig::default().with_prep_seconds(0).validate().is_err());
        assert!(TimerConfig::default().with_prep_seconds(1).validate().is_ok());
        assert!(TimerConfig::default().with_prep_seconds(60).validate().is_ok());
        assert!(TimerConfig::default().with_prep_seconds(61).validate().is_err());
    }

    #[test]
    fn test_validate_countdown_beeps_too_high() {
        let config = TimerConfig::default().with_countdown_beeps(11);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let json = r#"{"prep_seconds": 10, "speech_enabled": false}"#;
        let config: TimerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.prep_seconds, 10);
        assert!(!config.speech_enabled);
        assert_eq!(config.countdown_beeps, 3);
        assert!(config.sound_enabled);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TimerConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, TimerConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"countdown_beeps": 5, "tone_frequency_hz": 440}"#).unwrap();

        let config = TimerConfig::load(&path).unwrap();
        assert_eq!(config.countdown_beeps, 5);
        assert_eq!(config.tone_frequency_hz, 440);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"prep_seconds": 0}"#).unwrap();

        assert!(matches!(
            TimerConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(TimerConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_default_data_dir_name() {
        let dir = default_data_dir();
        assert!(dir.ends_with(DATA_DIR_NAME));
    }
}
