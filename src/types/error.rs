//! Workout validation errors.

use thiserror::Error;

/// Reasons a [`WorkoutDefinition`](super::WorkoutDefinition) is rejected
/// before a session can start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The workout name is empty or whitespace only.
    #[error("ワークアウト名は空にできません")]
    EmptyName,

    /// The workout has zero sets.
    #[error("セット数は1以上で指定してください")]
    ZeroSets,

    /// The workout has no phases.
    #[error("フェーズが1つもありません")]
    NoPhases,

    /// A phase has a zero-length duration.
    #[error("フェーズ '{0}' の時間は1秒以上で指定してください")]
    NonPositiveDuration(String),

    /// An exercise/rest interval is shorter than the allowed minimum.
    #[error("{field}は{min}秒以上で指定してください（指定値: {value}秒）")]
    IntervalTooShort {
        /// Which interval field was rejected.
        field: &'static str,
        /// The provided value in seconds.
        value: u32,
        /// The minimum accepted value in seconds.
        min: u32,
    },

    /// Every phase is a rest phase.
    #[error("運動フェーズが少なくとも1つ必要です")]
    NoExercisePhase,
}

impl ValidationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::EmptyName => "ワークアウトに名前を付けてください",
            Self::ZeroSets => "--sets に1以上の値を指定してください",
            Self::NoPhases => "--phase でフェーズを追加してください",
            Self::NonPositiveDuration(_) => "フェーズの秒数を確認してください",
            Self::IntervalTooShort { .. } => "運動・休憩時間は3秒以上にしてください",
            Self::NoExercisePhase => "フェーズの種類に exercise を含めてください",
        }
    }
}
