// simulator.rs
//
// In-process implementation of the notification platform. Stands in for the
// device on desktop hosts and in tests: permission answers, token issuance
// and failures are configured up front, every call is recorded.

use crate::platform::{NotificationPlatform, ReceivedListener, ResponseListener};
use crate::subscription::{lock, ListenerRegistry, Subscription};
use crate::types::{
    Notification, NotificationBehavior, NotificationChannel, NotificationContent,
    NotificationRequest, NotificationResponse, NotificationTrigger, PermissionResponse,
    PlatformOs, PushToken, PushTokenOptions,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug as log_debug, info as log_info};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Platform operations recorded by [`SimulatedPlatform`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformCall {
    SetNotificationChannel,
    GetPermissions,
    RequestPermissions,
    GetPushToken,
    ScheduleNotification,
    SetNotificationHandler,
}

#[derive(Debug)]
struct SimulatorState {
    permissions: PermissionResponse,
    prompt_result: PermissionResponse,
    token: String,
    permission_error: Option<String>,
    token_error: Option<String>,
    channel_error: Option<String>,
    schedule_error: Option<String>,
    calls: Vec<PlatformCall>,
    channels: HashMap<String, NotificationChannel>,
    token_options: Vec<PushTokenOptions>,
    scheduled: Vec<NotificationRequest>,
    behavior: Option<NotificationBehavior>,
}

pub struct SimulatedPlatform {
    os: PlatformOs,
    physical_device: bool,
    state: Mutex<SimulatorState>,
    received: ListenerRegistry<Notification>,
    responses: ListenerRegistry<NotificationResponse>,
}

impl SimulatedPlatform {
    /// A physical iOS device that has not been asked for permission yet and
    /// grants it when prompted
    pub fn new() -> Self {
        Self {
            os: PlatformOs::Ios,
            physical_device: true,
            state: Mutex::new(SimulatorState {
                permissions: PermissionResponse::askable(),
                prompt_result: PermissionResponse::granted(),
                token: format!("ExponentPushToken[{}]", Uuid::new_v4().simple()),
                permission_error: None,
                token_error: None,
                channel_error: None,
                schedule_error: None,
                calls: Vec::new(),
                channels: HashMap::new(),
                token_options: Vec::new(),
                scheduled: Vec::new(),
                behavior: None,
            }),
            received: ListenerRegistry::new(),
            responses: ListenerRegistry::new(),
        }
    }

    pub fn with_os(mut self, os: PlatformOs) -> Self {
        self.os = os;
        self
    }

    /// `false` simulates a simulator or emulator
    pub fn with_physical_device(mut self, physical_device: bool) -> Self {
        self.physical_device = physical_device;
        self
    }

    /// Permission state reported before any prompt
    pub fn with_permissions(mut self, permissions: PermissionResponse) -> Self {
        self.state_mut().permissions = permissions;
        self
    }

    /// What the user answers when prompted
    pub fn with_prompt_result(mut self, prompt_result: PermissionResponse) -> Self {
        self.state_mut().prompt_result = prompt_result;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.state_mut().token = token.into();
        self
    }

    pub fn with_permission_error(mut self, message: impl Into<String>) -> Self {
        self.state_mut().permission_error = Some(message.into());
        self
    }

    pub fn with_token_error(mut self, message: impl Into<String>) -> Self {
        self.state_mut().token_error = Some(message.into());
        self
    }

    pub fn with_channel_error(mut self, message: impl Into<String>) -> Self {
        self.state_mut().channel_error = Some(message.into());
        self
    }

    pub fn with_schedule_error(mut self, message: impl Into<String>) -> Self {
        self.state_mut().schedule_error = Some(message.into());
        self
    }

    fn state_mut(&mut self) -> &mut SimulatorState {
        self.state
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: PlatformCall) -> std::sync::MutexGuard<'_, SimulatorState> {
        let mut state = lock(&self.state);
        state.calls.push(call);
        state
    }

    /// Deliver an incoming notification to every received listener
    pub fn deliver(&self, content: NotificationContent) -> Notification {
        let request = NotificationRequest::immediate(content)
            .with_identifier(Uuid::new_v4().to_string());
        let notification = Notification::delivered_now(request);

        let listeners = self.received.emit(&notification);
        log_debug!(
            "Delivered notification {} to {} listener(s)",
            notification.identifier(),
            listeners
        );
        notification
    }

    /// Simulate the user interacting with `notification`, returning how many listeners ran
    pub fn respond(&self, response: NotificationResponse) -> usize {
        self.responses.emit(&response)
    }

    /// Every platform call made so far, in order
    pub fn calls(&self) -> Vec<PlatformCall> {
        lock(&self.state).calls.clone()
    }

    pub fn count(&self, call: PlatformCall) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|recorded| **recorded == call)
            .count()
    }

    pub fn channels(&self) -> HashMap<String, NotificationChannel> {
        lock(&self.state).channels.clone()
    }

    pub fn scheduled(&self) -> Vec<NotificationRequest> {
        lock(&self.state).scheduled.clone()
    }

    pub fn last_token_options(&self) -> Option<PushTokenOptions> {
        lock(&self.state).token_options.last().cloned()
    }

    /// Current permission state, updated by prompts
    pub fn permissions(&self) -> PermissionResponse {
        lock(&self.state).permissions
    }

    pub fn notification_behavior(&self) -> Option<NotificationBehavior> {
        lock(&self.state).behavior
    }

    pub fn received_listener_count(&self) -> usize {
        self.received.len()
    }

    pub fn response_listener_count(&self) -> usize {
        self.responses.len()
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationPlatform for SimulatedPlatform {
    fn os(&self) -> PlatformOs {
        self.os
    }

    fn is_device(&self) -> bool {
        self.physical_device
    }

    async fn set_notification_channel(
        &self,
        channel_id: &str,
        channel: &NotificationChannel,
    ) -> Result<()> {
        let mut state = self.record(PlatformCall::SetNotificationChannel);
        if let Some(message) = &state.channel_error {
            return Err(anyhow!("{}", message));
        }

        state
            .channels
            .insert(channel_id.to_string(), channel.clone());
        Ok(())
    }

    async fn get_permissions(&self) -> Result<PermissionResponse> {
        let state = self.record(PlatformCall::GetPermissions);
        match &state.permission_error {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(state.permissions),
        }
    }

    async fn request_permissions(&self) -> Result<PermissionResponse> {
        let mut state = self.record(PlatformCall::RequestPermissions);
        if let Some(message) = &state.permission_error {
            return Err(anyhow!("{}", message));
        }

        state.permissions = state.prompt_result;
        log_info!(
            "Simulated permission prompt answered: granted={}",
            state.permissions.granted
        );
        Ok(state.permissions)
    }

    async fn get_push_token(&self, options: &PushTokenOptions) -> Result<PushToken> {
        let mut state = self.record(PlatformCall::GetPushToken);
        state.token_options.push(options.clone());

        match &state.token_error {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(PushToken::new(state.token.clone())),
        }
    }

    async fn schedule_notification(&self, request: NotificationRequest) -> Result<String> {
        let request = {
            let mut state = self.record(PlatformCall::ScheduleNotification);
            if let Some(message) = &state.schedule_error {
                return Err(anyhow!("{}", message));
            }

            let request = request.with_identifier(Uuid::new_v4().to_string());
            state.scheduled.push(request.clone());
            request
        };

        let identifier = request.identifier.clone();
        match request.trigger {
            NotificationTrigger::Immediate => {
                self.received.emit(&Notification::delivered_now(request));
            }
        }
        Ok(identifier)
    }

    fn set_notification_handler(&self, behavior: NotificationBehavior) {
        self.record(PlatformCall::SetNotificationHandler).behavior = Some(behavior);
    }

    fn add_notification_received_listener(&self, listener: ReceivedListener) -> Subscription {
        self.received.add(listener)
    }

    fn add_notification_response_listener(&self, listener: ResponseListener) -> Subscription {
        self.responses.add(listener)
    }

    fn platform_name(&self) -> &'static str {
        "Simulator"
    }
}
