// tauri_platform.rs
//
// Notification platform backed by tauri-plugin-notification. The plugin
// covers permissions, local notifications and Android channels; push tokens
// come from an injected PushTokenService.

use crate::platform::{NotificationPlatform, ReceivedListener, ResponseListener};
use crate::subscription::{lock, ListenerRegistry, Subscription};
use crate::types::{
    Notification, NotificationBehavior, NotificationChannel, NotificationRequest,
    NotificationResponse, PermissionResponse, PlatformOs, PushToken, PushTokenOptions,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug as log_debug, error as log_error, info as log_info};
use std::sync::{Arc, Mutex};
use tauri::{AppHandle, Runtime};
use tauri_plugin_notification::{NotificationExt, PermissionState};
use uuid::Uuid;

/// Issues push tokens for the running installation
#[async_trait]
pub trait PushTokenService: Send + Sync {
    async fn issue_token(&self, options: &PushTokenOptions) -> Result<PushToken>;
}

pub struct TauriPlatform<R: Runtime> {
    app_handle: AppHandle<R>,
    token_service: Option<Arc<dyn PushTokenService>>,
    behavior: Mutex<NotificationBehavior>,
    received: ListenerRegistry<Notification>,
    responses: ListenerRegistry<NotificationResponse>,
}

impl<R: Runtime> TauriPlatform<R> {
    pub fn new(app_handle: AppHandle<R>) -> Self {
        Self {
            app_handle,
            token_service: None,
            behavior: Mutex::new(NotificationBehavior::default()),
            received: ListenerRegistry::new(),
            responses: ListenerRegistry::new(),
        }
    }

    pub fn with_token_service(mut self, service: Arc<dyn PushTokenService>) -> Self {
        self.token_service = Some(service);
        self
    }

    /// Forward a notification the host received outside the plugin (e.g. a remote push)
    pub fn dispatch_received(&self, notification: Notification) -> usize {
        self.received.emit(&notification)
    }

    /// Forward the user's interaction with a delivered notification
    pub fn dispatch_response(&self, response: NotificationResponse) -> usize {
        self.responses.emit(&response)
    }
}

fn permission_response(state: PermissionState) -> PermissionResponse {
    match state {
        PermissionState::Granted => PermissionResponse::granted(),
        PermissionState::Denied => PermissionResponse::blocked(),
        _ => PermissionResponse::askable(),
    }
}

#[async_trait]
impl<R: Runtime> NotificationPlatform for TauriPlatform<R> {
    fn os(&self) -> PlatformOs {
        PlatformOs::current()
    }

    fn is_device(&self) -> bool {
        // Desktop builds have no push token issuance
        matches!(self.os(), PlatformOs::Android | PlatformOs::Ios)
    }

    #[cfg(target_os = "android")]
    async fn set_notification_channel(
        &self,
        channel_id: &str,
        channel: &NotificationChannel,
    ) -> Result<()> {
        use crate::types::AndroidImportance;
        use tauri_plugin_notification::{Channel, Importance};

        let importance = match channel.importance {
            AndroidImportance::Max | AndroidImportance::High => Importance::High,
            AndroidImportance::Default | AndroidImportance::Unspecified => Importance::Default,
            AndroidImportance::Low => Importance::Low,
            AndroidImportance::Min => Importance::Min,
            AndroidImportance::None => Importance::None,
        };

        let plugin_channel = Channel::builder(channel_id, &channel.name)
            .importance(importance)
            .vibration(!channel.vibration_pattern.is_empty())
            .lights(true)
            .light_color(&channel.light_color)
            .build();

        self.app_handle
            .notification()
            .create_channel(plugin_channel)
            .map_err(|e| anyhow!("Failed to create notification channel {}: {}", channel_id, e))
    }

    #[cfg(not(target_os = "android"))]
    async fn set_notification_channel(
        &self,
        channel_id: &str,
        _channel: &NotificationChannel,
    ) -> Result<()> {
        log_debug!("Notification channels are Android-only, ignoring {}", channel_id);
        Ok(())
    }

    async fn get_permissions(&self) -> Result<PermissionResponse> {
        let state = self
            .app_handle
            .notification()
            .permission_state()
            .map_err(|e| anyhow!("Failed to query notification permission: {}", e))?;
        Ok(permission_response(state))
    }

    async fn request_permissions(&self) -> Result<PermissionResponse> {
        let state = self
            .app_handle
            .notification()
            .request_permission()
            .map_err(|e| anyhow!("Failed to request notification permission: {}", e))?;
        log_info!("Notification permission prompt answered: {:?}", state);
        Ok(permission_response(state))
    }

    async fn get_push_token(&self, options: &PushTokenOptions) -> Result<PushToken> {
        match &self.token_service {
            Some(service) => service.issue_token(options).await,
            None => Err(anyhow!("No push token service configured for this app")),
        }
    }

    async fn schedule_notification(&self, request: NotificationRequest) -> Result<String> {
        let request = request.with_identifier(Uuid::new_v4().to_string());
        let behavior = *lock(&self.behavior);

        if behavior.shows_alert() {
            let mut builder = self
                .app_handle
                .notification()
                .builder()
                .title(&request.content.title)
                .body(&request.content.body);
            for (key, value) in &request.content.data {
                builder = builder.extra(key.clone(), value.clone());
            }

            builder.show().map_err(|e| {
                log_error!("Failed to show Tauri notification: {}", e);
                anyhow!("Failed to show notification: {}", e)
            })?;
        }

        let identifier = request.identifier.clone();
        self.received.emit(&Notification::delivered_now(request));
        Ok(identifier)
    }

    fn set_notification_handler(&self, behavior: NotificationBehavior) {
        *lock(&self.behavior) = behavior;
    }

    fn add_notification_received_listener(&self, listener: ReceivedListener) -> Subscription {
        self.received.add(listener)
    }

    fn add_notification_response_listener(&self, listener: ResponseListener) -> Subscription {
        self.responses.add(listener)
    }

    fn platform_name(&self) -> &'static str {
        "Tauri"
    }
}
