//! Speech error types.
//!
//! Speech is best-effort: every error is logged and the countdown carries on
//! without announcements.

use thiserror::Error;

/// Errors that can occur while announcing a phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// No speech synthesizer command was found on PATH.
    #[error("音声合成コマンドが見つかりません（say / spd-say / espeak）")]
    CommandNotFound,

    /// The speech command could not be started.
    #[error("音声合成コマンド '{0}' の起動に失敗しました: {1}")]
    SpawnFailed(String, String),

    /// The speech command exited with an error.
    #[error("音声合成コマンド '{0}' がエラー終了しました: {1}")]
    CommandFailed(String, String),
}

impl SpeechError {
    /// Returns true if no synthesizer is installed.
    #[must_use]
    pub fn is_command_not_found(&self) -> bool {
        matches!(self, Self::CommandNotFound)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::CommandNotFound => {
                "speech-dispatcher または espeak をインストールしてください"
            }
            Self::SpawnFailed(_, _) => "コマンドの実行権限を確認してください",
            Self::CommandFailed(_, _) => "--no-speech で読み上げを無効にできます",
        }
    }
}
