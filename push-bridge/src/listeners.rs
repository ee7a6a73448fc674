use crate::delegate::NotificationDelegate;
use crate::platform::NotificationPlatform;
use crate::subscription::Subscription;
use crate::types::{Notification, NotificationResponse};
use log::debug as log_debug;
use std::sync::Arc;

/// Both event subscriptions held by an active bridge.
///
/// Acquired together and released together; dropping the guard releases
/// them, so no exit path leaves a listener behind.
#[derive(Debug)]
pub struct ListenerGuard {
    received: Subscription,
    response: Subscription,
}

impl ListenerGuard {
    /// Subscribe `delegate` to received notifications and notification responses
    pub fn acquire(
        platform: &dyn NotificationPlatform,
        delegate: Arc<dyn NotificationDelegate>,
    ) -> Self {
        let on_received = Arc::clone(&delegate);
        let received = platform.add_notification_received_listener(Arc::new(
            move |notification: Notification| on_received.on_notification(notification),
        ));

        let response = platform.add_notification_response_listener(Arc::new(
            move |response: NotificationResponse| delegate.on_notification_response(response),
        ));

        log_debug!(
            "Subscribed to {} notification events",
            platform.platform_name()
        );
        Self { received, response }
    }

    pub fn release(self) {
        let Self { received, response } = self;
        received.remove();
        response.remove();
        log_debug!("Released notification event subscriptions");
    }
}
