//! Notification backend on top of the macOS notification center.

use std::cell::Cell;
use std::time::Duration;

use objc2::rc::Retained;
use objc2::MainThreadMarker;
use tracing::{info, warn};

use super::center::NotificationCenter;
use super::content::create_progress_content;
use super::delegate::NotificationDelegate;
use super::error::NotificationError;
use super::request::create_notification_request_with_id;
use super::{NotificationBackend, PermissionStatus};

/// How long to wait for the user to answer the permission prompt.
const PERMISSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts notifications through `UNUserNotificationCenter`.
pub struct UserNotificationBackend {
    permission: Cell<Option<PermissionStatus>>,
    /// Retained delegate to keep it alive.
    _delegate: Retained<NotificationDelegate>,
}

impl UserNotificationBackend {
    /// Sets up the notification center.
    ///
    /// # Errors
    ///
    /// Returns an error if not running on the main thread or outside an
    /// application bundle.
    pub fn new() -> Result<Self, NotificationError> {
        let mtm = MainThreadMarker::new().ok_or_else(|| {
            NotificationError::InitializationFailed(
                "通知システムはメインスレッドで初期化する必要があります".to_string(),
            )
        })?;

        if !NotificationCenter::is_bundled() {
            return Err(NotificationError::NotBundled);
        }

        let delegate = NotificationDelegate::new(mtm);
        NotificationCenter::set_delegate(&NotificationDelegate::as_protocol(&delegate));

        Ok(Self {
            permission: Cell::new(None),
            _delegate: delegate,
        })
    }

    /// Creates the backend, returning None (with the reason logged) when the
    /// notification center is unusable.
    #[must_use]
    pub fn try_new() -> Option<Self> {
        match Self::new() {
            Ok(backend) => Some(backend),
            Err(e) => {
                warn!("⚠️  {}", e);
                info!("{}", e.suggestion());
                None
            }
        }
    }
}

impl NotificationBackend for UserNotificationBackend {
    fn request_permission(&self) -> PermissionStatus {
        if let Some(status) = self.permission.get() {
            return status;
        }

        let status = match NotificationCenter::request_authorization(PERMISSION_TIMEOUT) {
            Ok(true) => PermissionStatus::Granted,
            Ok(false) => {
                warn!("⚠️  {}", NotificationError::PermissionDenied);
                PermissionStatus::Denied
            }
            Err(e) => {
                warn!("⚠️  {}", e);
                PermissionStatus::Denied
            }
        };
        self.permission.set(Some(status));
        status
    }

    fn post_or_update(&self, id: &str, title: &str, body: &str) -> Result<(), NotificationError> {
        if self.permission.get() == Some(PermissionStatus::Denied) {
            return Err(NotificationError::PermissionDenied);
        }
        let content = create_progress_content(title, body);
        let request = create_notification_request_with_id(id, &content);
        NotificationCenter::add_notification_request(&request);
        Ok(())
    }

    fn cancel_all(&self) {
        NotificationCenter::remove_all_pending_notifications();
        NotificationCenter::remove_all_delivered_notifications();
    }
}
