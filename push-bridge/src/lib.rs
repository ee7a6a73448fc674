// Push notification bridge
//
// Requests notification permission, registers the device for push tokens,
// hands tokens to the host for storage, schedules local notifications and
// forwards incoming ones to the host.

pub mod bridge;
pub mod config;
pub mod delegate;
pub mod error;
pub mod handler;
pub mod listeners;
pub mod permissions;
pub mod platform;
pub mod simulator;
pub mod subscription;
pub mod types;

#[cfg(feature = "tauri")]
pub mod tauri_platform;

// Re-export main types for easy access
pub use bridge::NotificationBridge;
pub use config::{BridgeConfig, PROJECT_ID_ENV};
pub use delegate::NotificationDelegate;
pub use error::{BridgeError, BridgeResult};
pub use handler::{
    applied_notification_behavior, configure_notification_handler,
    is_notification_handler_configured,
};
pub use permissions::resolve_permission_status;
pub use platform::NotificationPlatform;
pub use simulator::{PlatformCall, SimulatedPlatform};
pub use subscription::{ListenerRegistry, Subscription};
pub use types::{
    BridgeState, Notification, NotificationBehavior, NotificationChannel, NotificationContent,
    NotificationData, NotificationRequest, NotificationResponse, NotificationTrigger,
    PermissionResponse, PermissionStatus, PlatformOs, PushToken, PushTokenOptions,
};

#[cfg(feature = "tauri")]
pub use tauri_platform::{PushTokenService, TauriPlatform};
