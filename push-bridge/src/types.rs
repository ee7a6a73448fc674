use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Structured payload attached to a notification
pub type NotificationData = Map<String, Value>;

/// Action identifier reported when the user taps a notification without picking an action
pub const DEFAULT_ACTION_IDENTIFIER: &str = "expo.modules.notifications.actions.DEFAULT";

/// Id of the channel the bridge configures on Android
pub const DEFAULT_CHANNEL_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Undetermined => "undetermined",
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw permission result as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub granted: bool,
    pub can_ask_again: bool,
}

impl PermissionResponse {
    pub fn new(granted: bool, can_ask_again: bool) -> Self {
        Self {
            granted,
            can_ask_again,
        }
    }

    pub fn granted() -> Self {
        Self::new(true, false)
    }

    /// Not granted yet, but the user can still be prompted
    pub fn askable() -> Self {
        Self::new(false, true)
    }

    /// Not granted and the platform will not show the prompt again
    pub fn blocked() -> Self {
        Self::new(false, false)
    }
}

/// Opaque token addressing one app installation on one device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushToken(String);

impl PushToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PushToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scope of a push token request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenOptions {
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformOs {
    Android,
    Ios,
    Web,
    Desktop,
}

impl PlatformOs {
    /// Platform family of the binary being built
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            PlatformOs::Android
        } else if cfg!(target_os = "ios") {
            PlatformOs::Ios
        } else if cfg!(target_arch = "wasm32") {
            PlatformOs::Web
        } else {
            PlatformOs::Desktop
        }
    }

    pub fn is_android(&self) -> bool {
        matches!(self, PlatformOs::Android)
    }

    pub fn is_web(&self) -> bool {
        matches!(self, PlatformOs::Web)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: NotificationData,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: NotificationData::new(),
        }
    }

    pub fn with_data(mut self, data: NotificationData) -> Self {
        self.data = data;
        self
    }
}

/// When a scheduled notification should fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTrigger {
    #[default]
    Immediate,
}

/// A notification handed to the local scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Empty until the scheduler assigns one
    #[serde(default)]
    pub identifier: String,
    pub content: NotificationContent,
    #[serde(default)]
    pub trigger: NotificationTrigger,
}

impl NotificationRequest {
    pub fn immediate(content: NotificationContent) -> Self {
        Self {
            identifier: String::new(),
            content,
            trigger: NotificationTrigger::Immediate,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }
}

/// A delivered notification, local or remote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub request: NotificationRequest,
    pub date: DateTime<Utc>,
}

impl Notification {
    pub fn delivered_now(request: NotificationRequest) -> Self {
        Self {
            request,
            date: Utc::now(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.request.identifier
    }

    pub fn content(&self) -> &NotificationContent {
        &self.request.content
    }
}

/// The user's interaction with a delivered notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub notification: Notification,
    pub action_identifier: String,
    pub user_text: Option<String>,
}

impl NotificationResponse {
    pub fn default_action(notification: Notification) -> Self {
        Self {
            notification,
            action_identifier: DEFAULT_ACTION_IDENTIFIER.to_string(),
            user_text: None,
        }
    }
}

/// Android channel importance levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidImportance {
    Unspecified,
    None,
    Min,
    Low,
    Default,
    High,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub name: String,
    pub importance: AndroidImportance,
    pub vibration_pattern: Vec<u64>,
    pub light_color: String,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            importance: AndroidImportance::Max,
            vibration_pattern: vec![0, 250, 250, 250],
            light_color: "#FF231F7C".to_string(),
        }
    }
}

/// How the platform presents a notification that arrives while the app runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationBehavior {
    pub should_show_banner: bool,
    pub should_show_list: bool,
    pub should_play_sound: bool,
    pub should_set_badge: bool,
}

impl Default for NotificationBehavior {
    fn default() -> Self {
        Self {
            should_show_banner: true,
            should_show_list: true,
            should_play_sound: true,
            should_set_badge: true,
        }
    }
}

impl NotificationBehavior {
    pub fn shows_alert(&self) -> bool {
        self.should_show_banner || self.should_show_list
    }
}

/// Observable bridge state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BridgeState {
    /// Empty until the first successful registration
    pub push_token: String,
    pub permission_status: Option<PermissionStatus>,
}
