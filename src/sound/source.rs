//! Tone source selection.
//!
//! The countdown tone is either synthesized (a short sine beep) or read
//! from an audio file chosen in the configuration.

use std::path::{Path, PathBuf};

use crate::config::TimerConfig;

/// Pitch of the default built-in tone.
pub const DEFAULT_TONE_FREQUENCY_HZ: u32 = 880;

/// Length of the default built-in tone.
pub const DEFAULT_TONE_DURATION_MS: u64 = 150;

/// Where the countdown tone comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToneSource {
    /// A synthesized sine beep.
    Builtin {
        /// Pitch in hertz.
        frequency_hz: u32,
        /// Length in milliseconds.
        duration_ms: u64,
    },
    /// An audio file on disk (any format rodio can decode).
    File {
        /// Path to the file.
        path: PathBuf,
    },
}

impl Default for ToneSource {
    fn default() -> Self {
        Self::builtin(DEFAULT_TONE_FREQUENCY_HZ, DEFAULT_TONE_DURATION_MS)
    }
}

impl ToneSource {
    /// Creates a built-in beep source.
    #[must_use]
    pub fn builtin(frequency_hz: u32, duration_ms: u64) -> Self {
        Self::Builtin {
            frequency_hz,
            duration_ms,
        }
    }

    /// Creates a file source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Picks the tone configured in `config`.
    ///
    /// A configured `tone_file` wins over the built-in beep settings.
    #[must_use]
    pub fn from_config(config: &TimerConfig) -> Self {
        match &config.tone_file {
            Some(path) => Self::file(path.clone()),
            None => Self::builtin(config.tone_frequency_hz, config.tone_duration_ms),
        }
    }

    /// Returns a short human-readable name for logging.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Builtin { frequency_hz, .. } => format!("builtin {frequency_hz}Hz"),
            Self::File { path } => file_stem(path),
        }
    }

    /// Returns true if this is a synthesized tone.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Returns true if this is a file tone.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
