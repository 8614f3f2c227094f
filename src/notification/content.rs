//! Notification content construction.

use objc2::rc::Retained;
use objc2_foundation::NSString;
use objc2_user_notifications::UNMutableNotificationContent;

use super::sanitize_text;

/// Builder for constructing notification content.
pub struct NotificationContentBuilder {
    content: Retained<UNMutableNotificationContent>,
}

impl NotificationContentBuilder {
    /// Creates a new notification content builder.
    #[must_use]
    pub fn new() -> Self {
        let content = unsafe { UNMutableNotificationContent::new() };
        Self { content }
    }

    /// Sets the notification title.
    #[must_use]
    pub fn title(self, title: &str) -> Self {
        let title = NSString::from_str(title);
        unsafe {
            self.content.setTitle(&title);
        }
        self
    }

    /// Sets the notification body text.
    #[must_use]
    pub fn body(self, body: &str) -> Self {
        let body = NSString::from_str(body);
        unsafe {
            self.content.setBody(&body);
        }
        self
    }

    /// Builds and returns the notification content.
    #[must_use]
    pub fn build(self) -> Retained<UNMutableNotificationContent> {
        self.content
    }
}

impl Default for NotificationContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the silent progress content. The countdown tone is played by the
/// session, so the notification carries no sound.
#[must_use]
pub fn create_progress_content(title: &str, body: &str) -> Retained<UNMutableNotificationContent> {
    let mut builder = NotificationContentBuilder::new();
    if let Some(title) = sanitize_text(title) {
        builder = builder.title(&title);
    }
    if let Some(body) = sanitize_text(body) {
        builder = builder.body(&body);
    }
    builder.build()
}
