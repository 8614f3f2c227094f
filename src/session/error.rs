//! Session error types.

use thiserror::Error;

use crate::types::ValidationError;

/// Errors returned by the session controller and its handles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The workout was rejected before the session started.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session a handle refers to has ended.
    #[error("セッションは既に終了しています")]
    Closed,
}

impl SessionError {
    /// Returns true if the workout definition was invalid.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.suggestion(),
            Self::Closed => "新しいセッションを開始してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_transparent() {
        let err = SessionError::from(ValidationError::ZeroSets);
        assert_eq!(err.to_string(), ValidationError::ZeroSets.to_string());
        assert!(err.is_validation_error());
        assert_eq!(err.suggestion(), ValidationError::ZeroSets.suggestion());
    }

    #[test]
    fn test_closed() {
        let err = SessionError::Closed;
        assert!(!err.is_validation_error());
        assert!(err.to_string().contains("終了"));
    }
}
