//! UNUserNotificationCenter wrapper.

use std::cell::RefCell;
use std::sync::mpsc;
use std::time::Duration;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{Bool, ProtocolObject};
use objc2_foundation::{NSBundle, NSError};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNNotificationRequest, UNUserNotificationCenter,
    UNUserNotificationCenterDelegate,
};
use tracing::{debug, warn};

use super::error::NotificationError;

pub struct NotificationCenter;

impl NotificationCenter {
    #[must_use]
    pub fn current() -> Retained<UNUserNotificationCenter> {
        UNUserNotificationCenter::currentNotificationCenter()
    }

    /// The notification center raises an exception for processes without a
    /// bundle identifier.
    #[must_use]
    pub fn is_bundled() -> bool {
        NSBundle::mainBundle().bundleIdentifier().is_some()
    }

    /// Requests authorization and waits up to `wait` for the user's answer.
    pub fn request_authorization(wait: Duration) -> Result<bool, NotificationError> {
        let (tx, rx) = mpsc::channel::<Result<bool, NotificationError>>();

        let options = UNAuthorizationOptions::Alert | UNAuthorizationOptions::Sound;

        let cb = RefCell::new(Some(tx));
        let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
            if let Some(sender) = cb.borrow_mut().take() {
                let result = match unsafe { error.as_ref() } {
                    Some(err) => Err(NotificationError::AuthorizationFailed(
                        err.localizedDescription().to_string(),
                    )),
                    None => Ok(granted.as_bool()),
                };
                let _ = sender.send(result);
            }
        });

        Self::current().requestAuthorizationWithOptions_completionHandler(options, &block);

        rx.recv_timeout(wait).map_err(|_| {
            NotificationError::AuthorizationFailed("許可ダイアログがタイムアウトしました".to_string())
        })?
    }

    pub fn set_delegate(delegate: &ProtocolObject<dyn UNUserNotificationCenterDelegate>) {
        Self::current().setDelegate(Some(delegate));
    }

    /// Submits `request`. Delivery failures are reported asynchronously and
    /// only logged.
    pub fn add_notification_request(request: &UNNotificationRequest) {
        let block = RcBlock::new(move |error: *mut NSError| match unsafe { error.as_ref() } {
            Some(err) => warn!(
                "{}",
                NotificationError::SendFailed(err.localizedDescription().to_string())
            ),
            None => debug!("Notification delivered"),
        });

        Self::current().addNotificationRequest_withCompletionHandler(request, Some(&block));
    }

    pub fn remove_all_pending_notifications() {
        Self::current().removeAllPendingNotificationRequests();
    }

    pub fn remove_all_delivered_notifications() {
        Self::current().removeAllDeliveredNotifications();
    }
}
