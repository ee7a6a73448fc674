// platform.rs
//
// Contract the bridge consumes from the device notification subsystem.
// Implemented by SimulatedPlatform and, behind the `tauri` feature, TauriPlatform.

use crate::subscription::{Listener, Subscription};
use crate::types::{
    Notification, NotificationBehavior, NotificationChannel, NotificationRequest,
    NotificationResponse, PermissionResponse, PlatformOs, PushToken, PushTokenOptions,
};
use anyhow::Result;
use async_trait::async_trait;

pub type ReceivedListener = Listener<Notification>;
pub type ResponseListener = Listener<NotificationResponse>;

/// Device notification subsystem
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    /// Platform family the app runs on
    fn os(&self) -> PlatformOs;

    /// False on simulators and emulators, which cannot receive push tokens
    fn is_device(&self) -> bool;

    /// Create or update an Android notification channel
    ///
    /// Calling this repeatedly with the same configuration must be harmless.
    async fn set_notification_channel(
        &self,
        channel_id: &str,
        channel: &NotificationChannel,
    ) -> Result<()>;

    async fn get_permissions(&self) -> Result<PermissionResponse>;

    /// Show the OS permission prompt and report its outcome
    async fn request_permissions(&self) -> Result<PermissionResponse>;

    async fn get_push_token(&self, options: &PushTokenOptions) -> Result<PushToken>;

    /// Schedule a local notification, returning the identifier the scheduler assigned
    async fn schedule_notification(&self, request: NotificationRequest) -> Result<String>;

    /// Install the process-wide policy for notifications arriving while the app runs
    fn set_notification_handler(&self, behavior: NotificationBehavior);

    fn add_notification_received_listener(&self, listener: ReceivedListener) -> Subscription;

    fn add_notification_response_listener(&self, listener: ResponseListener) -> Subscription;

    /// Get the platform name (for logging/debugging)
    fn platform_name(&self) -> &'static str;
}
