use crate::config::BridgeConfig;
use crate::delegate::NotificationDelegate;
use crate::error::{BridgeError, BridgeResult};
use crate::listeners::ListenerGuard;
use crate::permissions::resolve_permission_status;
use crate::platform::NotificationPlatform;
use crate::types::{
    BridgeState, NotificationContent, NotificationData, NotificationRequest, PermissionStatus,
    PushToken,
};
use log::{debug as log_debug, error as log_error, info as log_info, warn as log_warn};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Mediates between a host application and the device notification subsystem.
///
/// Tracks the current push token and permission status, registers for push
/// notifications on [`initialize`](Self::initialize), schedules local
/// notifications, and forwards incoming notifications to the delegate while
/// active.
pub struct NotificationBridge<P: NotificationPlatform> {
    platform: Arc<P>,
    delegate: Arc<dyn NotificationDelegate>,
    config: BridgeConfig,
    state: watch::Sender<BridgeState>,
    // Overlapping initialize calls run one after the other
    in_flight: Mutex<()>,
    listeners: Option<ListenerGuard>,
}

impl<P: NotificationPlatform> NotificationBridge<P> {
    pub fn new(
        platform: Arc<P>,
        delegate: Arc<dyn NotificationDelegate>,
        config: BridgeConfig,
    ) -> Self {
        let (state, _) = watch::channel(BridgeState::default());

        Self {
            platform,
            delegate,
            config,
            state,
            in_flight: Mutex::new(()),
            listeners: None,
        }
    }

    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Current push token, empty until the first successful registration
    pub fn expo_push_token(&self) -> String {
        self.state.borrow().push_token.clone()
    }

    /// Current permission status, `None` until the first registration attempt
    pub fn permission_status(&self) -> Option<PermissionStatus> {
        self.state.borrow().permission_status
    }

    pub fn state(&self) -> BridgeState {
        self.state.borrow().clone()
    }

    /// Watch token and permission changes
    pub fn subscribe(&self) -> watch::Receiver<BridgeState> {
        self.state.subscribe()
    }

    /// Register this device for push notifications.
    ///
    /// Returns immediately on the web. Elsewhere ensures the Android channel,
    /// resolves permission (prompting at most once), publishes the status and,
    /// when granted, fetches a push token and hands it to the delegate.
    pub async fn initialize(&self, identifier: &str) -> BridgeResult<()> {
        if self.platform.os().is_web() {
            log_debug!("Notifications are not supported on the web, skipping initialization");
            return Ok(());
        }

        let _in_flight = self.in_flight.lock().await;
        log_debug!("Initializing notifications for {}", identifier);

        self.run_initialize().await.map_err(|e| {
            log_error!("Failed to initialize notifications: {:#}", e);
            BridgeError::Initialize(e)
        })
    }

    async fn run_initialize(&self) -> anyhow::Result<()> {
        let Some(token) = self.register_for_push_notifications().await? else {
            return Ok(());
        };

        self.state
            .send_modify(|state| state.push_token = token.as_str().to_string());
        log_info!("Registered for push notifications");

        self.save_token(&token).await?;
        Ok(())
    }

    async fn register_for_push_notifications(&self) -> anyhow::Result<Option<PushToken>> {
        if self.platform.os().is_android() {
            self.platform
                .set_notification_channel(&self.config.channel_id, &self.config.channel)
                .await?;
        }

        if !self.platform.is_device() {
            log_info!("Push notifications require a physical device");
            self.publish_permission_status(PermissionStatus::Undetermined);
            return Ok(None);
        }

        let existing = self.platform.get_permissions().await?;
        let permissions = if resolve_permission_status(&existing).is_granted() {
            existing
        } else {
            log_info!("Requesting notification permission");
            self.platform.request_permissions().await?
        };

        let status = resolve_permission_status(&permissions);
        self.publish_permission_status(status);

        if !status.is_granted() {
            log_warn!("Notification permission not granted: {}", status);
            return Ok(None);
        }

        let token = self
            .platform
            .get_push_token(&self.config.push_token_options())
            .await?;

        if token.is_empty() {
            log_warn!("{} returned an empty push token", self.platform.platform_name());
            return Ok(None);
        }

        Ok(Some(token))
    }

    async fn save_token(&self, token: &PushToken) -> BridgeResult<()> {
        self.delegate
            .persist_token(token)
            .await
            .map_err(BridgeError::SaveToken)
    }

    fn publish_permission_status(&self, status: PermissionStatus) {
        self.state
            .send_modify(|state| state.permission_status = Some(status));
    }

    /// Fire a local notification right away; `data` defaults to an empty map
    pub async fn send_local_notification(
        &self,
        title: &str,
        body: &str,
        data: Option<NotificationData>,
    ) -> BridgeResult<()> {
        let content = NotificationContent::new(title, body).with_data(data.unwrap_or_default());

        match self
            .platform
            .schedule_notification(NotificationRequest::immediate(content))
            .await
        {
            Ok(identifier) => {
                log_debug!("Scheduled local notification {}", identifier);
                Ok(())
            }
            Err(e) => {
                log_error!("Error sending local notification: {}", e);
                Err(BridgeError::SendLocalNotification(e))
            }
        }
    }

    /// Start forwarding notification events to the delegate. No-op when already active.
    pub fn activate(&mut self) {
        if self.listeners.is_some() {
            return;
        }
        self.listeners = Some(ListenerGuard::acquire(
            self.platform.as_ref(),
            Arc::clone(&self.delegate),
        ));
    }

    /// Release both event subscriptions. No events reach the delegate afterwards.
    pub fn deactivate(&mut self) {
        if let Some(listeners) = self.listeners.take() {
            listeners.release();
        }
    }

    pub fn is_active(&self) -> bool {
        self.listeners.is_some()
    }

    /// Replace the delegate, resubscribing if active so events reach the new one
    pub fn set_delegate(&mut self, delegate: Arc<dyn NotificationDelegate>) {
        if Arc::ptr_eq(&self.delegate, &delegate) {
            return;
        }

        self.delegate = delegate;
        if self.is_active() {
            self.deactivate();
            self.activate();
        }
    }
}
