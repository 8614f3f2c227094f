//! Error types for the workout store.

use std::io;
use thiserror::Error;

use crate::types::ValidationError;

/// Workout store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the data directory.
    #[error("データディレクトリを作成できません: {0}")]
    DirectoryCreation(#[source] io::Error),

    /// Failed to read a stored value.
    #[error("データを読み込めません: {0}")]
    Read(#[source] io::Error),

    /// Failed to write a stored value.
    #[error("データを書き込めません: {0}")]
    Write(#[source] io::Error),

    /// A stored value is not valid JSON or has the wrong shape.
    #[error("保存データの形式が不正です: {0}")]
    Parse(#[source] serde_json::Error),

    /// A value could not be serialized.
    #[error("データをシリアライズできません: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The key contains characters not allowed in a file name.
    #[error("不正なキーです: '{0}'")]
    InvalidKey(String),

    /// No workout at the given position. Displayed 1-based, as in `list`.
    #[error("ワークアウト #{} は存在しません（登録数: {len}）", .index + 1)]
    IndexOutOfRange {
        /// Requested position (0-based)
        index: usize,
        /// Number of stored workouts
        len: usize,
    },

    /// The workout to be saved is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
