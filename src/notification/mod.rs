//! Workout progress notifications.
//!
//! A session keeps exactly one notification up to date: every post reuses
//! [`PROGRESS_NOTIFICATION_ID`], so the notification center shows only the
//! latest progress.
//!
//! The platform backend is optional. Where no notification center is usable
//! (other platforms, unbundled binaries, denied permission) the cue
//! dispatcher reports progress to the log instead.
//!
//! # Example
//!
//! ```rust
//! use workout_timer::notification::{
//!     MockNotificationBackend, NotificationBackend, PermissionStatus, PROGRESS_NOTIFICATION_ID,
//! };
//!
//! let backend = MockNotificationBackend::new();
//! assert_eq!(backend.request_permission(), PermissionStatus::Granted);
//! backend
//!     .post_or_update(PROGRESS_NOTIFICATION_ID, "Workout", "Time to exercise!")
//!     .unwrap();
//! backend.cancel_all();
//! ```

pub mod error;

#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod content;
#[cfg(target_os = "macos")]
mod delegate;
#[cfg(target_os = "macos")]
mod native;
#[cfg(target_os = "macos")]
mod request;

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use self::error::NotificationError;
#[cfg(target_os = "macos")]
pub use self::native::UserNotificationBackend;

/// Identifier shared by every progress notification of a session.
pub const PROGRESS_NOTIFICATION_ID: &str = "workout-progress";

/// Maximum length of a notification title or body.
const MAX_TEXT_LENGTH: usize = 200;

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Trait for local notification backends.
pub trait NotificationBackend {
    /// Asks the user for permission to post notifications.
    fn request_permission(&self) -> PermissionStatus;

    /// Posts the notification `id`, replacing an earlier one with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be submitted.
    fn post_or_update(&self, id: &str, title: &str, body: &str) -> Result<(), NotificationError>;

    /// Removes every pending and delivered notification of this process.
    fn cancel_all(&self);
}

/// Returns the notification backend of this platform, if one is usable.
#[must_use]
pub fn platform_backend() -> Option<Rc<dyn NotificationBackend>> {
    #[cfg(target_os = "macos")]
    {
        UserNotificationBackend::try_new().map(|b| Rc::new(b) as Rc<dyn NotificationBackend>)
    }

    #[cfg(not(target_os = "macos"))]
    {
        tracing::debug!("{}", NotificationError::NotAvailable);
        None
    }
}

/// Sanitizes text for display in a notification.
///
/// Control characters are removed and the text is truncated. Returns None if
/// nothing printable is left.
#[must_use]
pub fn sanitize_text(text: &str) -> Option<String> {
    let sanitized: String = text
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_TEXT_LENGTH)
        .collect();

    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// A notification recorded by [`MockNotificationBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedNotification {
    pub id: String,
    pub title: String,
    pub body: String,
}

/// Mock notification backend for testing.
#[derive(Debug)]
pub struct MockNotificationBackend {
    posts: Mutex<Vec<PostedNotification>>,
    permission_requests: AtomicUsize,
    cancel_count: AtomicUsize,
    granted: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockNotificationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            permission_requests: AtomicUsize::new(0),
            cancel_count: AtomicUsize::new(0),
            granted: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn posts(&self) -> Vec<PostedNotification> {
        self.posts.lock().unwrap().clone()
    }

    #[must_use]
    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    /// Returns the most recent post, i.e. what the user currently sees.
    #[must_use]
    pub fn last_post(&self) -> Option<PostedNotification> {
        self.posts.lock().unwrap().last().cloned()
    }

    #[must_use]
    pub fn permission_request_count(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }

    pub fn clear_recorded(&self) {
        self.posts.lock().unwrap().clear();
    }
}

impl NotificationBackend for MockNotificationBackend {
    fn request_permission(&self) -> PermissionStatus {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        if self.granted.load(Ordering::SeqCst) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    fn post_or_update(&self, id: &str, title: &str, body: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.posts.lock().unwrap().push(PostedNotification {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn cancel_all(&self) {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
    }
}
