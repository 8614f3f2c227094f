//! Sound system error types.
//!
//! Audio is best-effort: every error here is logged by the caller and the
//! countdown continues without sound.

use thiserror::Error;

/// Errors that can occur while loading or playing the countdown tone.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Tone file was not found at the specified path.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// Failed to decode the tone file.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the tone file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if loading should fall back to the built-in tone.
    #[must_use]
    pub fn should_fallback_to_builtin(&self) -> bool {
        self.is_file_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "オーディオデバイスを接続してください",
            Self::FileNotFound(_) => "内蔵トーンで再生します",
            Self::DecodeError(_) => "サウンドファイルが破損している可能性があります",
            Self::StreamError(_) => "オーディオ設定を確認してください",
            Self::PlaybackError(_) => "--no-sound で音を無効にできます",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("オーディオデバイスが利用できません"));

        let err = SoundError::FileNotFound("/path/to/beep.wav".to_string());
        assert!(err.to_string().contains("/path/to/beep.wav"));

        let err = SoundError::PlaybackError("released".to_string());
        assert!(err.to_string().contains("released"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::FileNotFound("x".into()).is_device_error());
        assert!(!SoundError::PlaybackError("x".into()).is_device_error());
    }

    #[test]
    fn test_should_fallback_to_builtin() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_builtin());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_builtin());
        assert!(!SoundError::DeviceNotAvailable("x".into()).should_fallback_to_builtin());
        assert!(!SoundError::StreamError("x".into()).should_fallback_to_builtin());
    }

    #[test]
    fn test_suggestion() {
        assert!(SoundError::DeviceNotAvailable("x".into())
            .suggestion()
            .contains("オーディオデバイス"));
        assert!(SoundError::FileNotFound("x".into())
            .suggestion()
            .contains("内蔵トーン"));
        assert!(SoundError::PlaybackError("x".into())
            .suggestion()
            .contains("--no-sound"));
    }
}
