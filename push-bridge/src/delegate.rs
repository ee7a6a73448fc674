use crate::types::{Notification, NotificationResponse, PushToken};
use anyhow::Result;
use async_trait::async_trait;

/// Capabilities the host application injects into the bridge.
///
/// The bridge owns no storage and no UI binding: tokens go to
/// `persist_token`, delivered notifications go to `on_notification`.
#[async_trait]
pub trait NotificationDelegate: Send + Sync {
    /// Store the token wherever the host keeps it (remote profile, local store, ...)
    async fn persist_token(&self, token: &PushToken) -> Result<()>;

    /// Called synchronously for every notification received while subscribed
    fn on_notification(&self, notification: Notification);

    /// Called when the user interacts with a delivered notification.
    ///
    /// Responses are discarded unless the host overrides this.
    fn on_notification_response(&self, _response: NotificationResponse) {}
}
