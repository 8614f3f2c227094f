//! Notification system error types.
//!
//! Notifications are optional: a denied permission or a failed post only
//! switches progress reporting to the log.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Failed to request notification authorization from the system.
    #[error("通知許可の取得に失敗しました: {0}")]
    AuthorizationFailed(String),

    /// Failed to post or update a notification.
    #[error("通知の送信に失敗しました: {0}")]
    SendFailed(String),

    /// Notification permission was denied by the user.
    #[error("通知許可が拒否されています")]
    PermissionDenied,

    /// The process has no application bundle (required by the notification
    /// center on macOS).
    #[error("アプリケーションバンドル外で実行されています")]
    NotBundled,

    /// Failed to initialize the notification system.
    #[error("通知システムの初期化に失敗しました: {0}")]
    InitializationFailed(String),

    /// The notification center is not available on this platform.
    #[error("通知センターが利用できません")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "システム環境設定 > 通知 でアプリの通知を許可してください"
            }
            Self::NotBundled => "進捗はログに出力されます",
            Self::SendFailed(_) => "通知センターを確認してください",
            Self::InitializationFailed(_) => "アプリケーションを再起動してください",
            Self::NotAvailable => "--verbose で進捗をログに出力できます",
        }
    }
}
