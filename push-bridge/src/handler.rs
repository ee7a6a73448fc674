// handler.rs
//
// Process-wide notification handling policy. Platforms keep one handler per
// process, so it is applied once at startup instead of per bridge instance.

use crate::platform::NotificationPlatform;
use crate::types::NotificationBehavior;
use log::{debug as log_debug, info as log_info};
use once_cell::sync::OnceCell;

static APPLIED_BEHAVIOR: OnceCell<NotificationBehavior> = OnceCell::new();

/// Install `behavior` as the platform's handling policy, once per process.
///
/// Returns `true` if this call applied it. Later calls leave the first policy
/// in place and return `false`.
pub fn configure_notification_handler(
    platform: &dyn NotificationPlatform,
    behavior: NotificationBehavior,
) -> bool {
    if APPLIED_BEHAVIOR.set(behavior).is_err() {
        log_debug!("Notification handler already configured, skipping");
        return false;
    }

    platform.set_notification_handler(behavior);
    log_info!(
        "Configured {} notification handler (alert: {}, sound: {}, badge: {})",
        platform.platform_name(),
        behavior.shows_alert(),
        behavior.should_play_sound,
        behavior.should_set_badge
    );
    true
}

/// The policy applied by [`configure_notification_handler`], if any
pub fn applied_notification_behavior() -> Option<NotificationBehavior> {
    APPLIED_BEHAVIOR.get().copied()
}

pub fn is_notification_handler_configured() -> bool {
    APPLIED_BEHAVIOR.get().is_some()
}
