mod common;

use common::{bridge_with, RecordingDelegate};
use push_bridge::{
    BridgeState, PermissionResponse, PermissionStatus, PlatformCall, PlatformOs,
    SimulatedPlatform,
};

#[tokio::test]
async fn prompt_grant_registers_and_persists_token() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new()
        .with_permissions(PermissionResponse::askable())
        .with_prompt_result(PermissionResponse::new(true, false))
        .with_token("tok-123");
    let (bridge, platform) = bridge_with(platform, delegate.clone());

    bridge.initialize("user-1").await.unwrap();

    assert_eq!(bridge.permission_status(), Some(PermissionStatus::Granted));
    assert_eq!(bridge.expo_push_token(), "tok-123");
    assert_eq!(delegate.tokens(), vec!["tok-123".to_string()]);
    assert_eq!(
        platform.calls(),
        vec![
            PlatformCall::GetPermissions,
            PlatformCall::RequestPermissions,
            PlatformCall::GetPushToken,
        ]
    );
}

#[tokio::test]
async fn already_granted_never_prompts() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new()
        .with_permissions(PermissionResponse::granted())
        .with_token("tok-granted");
    let (bridge, platform) = bridge_with(platform, delegate.clone());

    bridge.initialize("user-1").await.unwrap();

    assert_eq!(platform.count(PlatformCall::GetPermissions), 1);
    assert_eq!(platform.count(PlatformCall::RequestPermissions), 0);
    assert_eq!(bridge.expo_push_token(), delegate.tokens()[0]);
}

#[tokio::test]
async fn second_initialize_after_grant_skips_prompt() {
    let delegate = RecordingDelegate::new();
    let (bridge, platform) = bridge_with(SimulatedPlatform::new(), delegate.clone());

    bridge.initialize("user-1").await.unwrap();
    bridge.initialize("user-1").await.unwrap();

    assert_eq!(platform.count(PlatformCall::RequestPermissions), 1);
    assert_eq!(platform.count(PlatformCall::GetPermissions), 2);
    assert_eq!(platform.count(PlatformCall::GetPushToken), 2);
    assert_eq!(delegate.tokens().len(), 2);
}

#[tokio::test]
async fn undetermined_user_is_prompted_again_on_next_initialize() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new()
        .with_permissions(PermissionResponse::askable())
        .with_prompt_result(PermissionResponse::askable());
    let (bridge, platform) = bridge_with(platform, delegate.clone());

    bridge.initialize("user-1").await.unwrap();
    assert_eq!(
        bridge.permission_status(),
        Some(PermissionStatus::Undetermined)
    );

    bridge.initialize("user-1").await.unwrap();
    assert_eq!(platform.count(PlatformCall::RequestPermissions), 2);
    assert!(delegate.tokens().is_empty());
}

#[tokio::test]
async fn emulator_is_undetermined_without_token() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new().with_physical_device(false);
    let (bridge, platform) = bridge_with(platform, delegate.clone());

    bridge.initialize("user-1").await.unwrap();

    assert_eq!(
        bridge.permission_status(),
        Some(PermissionStatus::Undetermined)
    );
    assert_eq!(bridge.expo_push_token(), "");
    assert!(delegate.tokens().is_empty());
    assert_eq!(platform.count(PlatformCall::GetPushToken), 0);
    assert_eq!(platform.count(PlatformCall::GetPermissions), 0);
}

#[tokio::test]
async fn web_returns_without_platform_calls() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new().with_os(PlatformOs::Web);
    let (bridge, platform) = bridge_with(platform, delegate.clone());
    let updates = bridge.subscribe();

    bridge.initialize("user-1").await.unwrap();

    assert!(platform.calls().is_empty());
    assert_eq!(bridge.state(), BridgeState::default());
    assert!(!updates.has_changed().unwrap());
    assert!(delegate.tokens().is_empty());
}

#[tokio::test]
async fn persistence_failure_is_wrapped_and_token_still_published() {
    let delegate = RecordingDelegate::failing("firestore unavailable");
    let platform = SimulatedPlatform::new()
        .with_permissions(PermissionResponse::granted())
        .with_token("tok-err");
    let (bridge, _platform) = bridge_with(platform, delegate.clone());

    let err = bridge.initialize("user-1").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Failed to save token"), "{message}");
    assert!(message.contains("firestore unavailable"), "{message}");
    assert!(err.is_save_token());
    assert_eq!(delegate.tokens(), vec!["tok-err".to_string()]);
    assert_eq!(bridge.expo_push_token(), "tok-err");
}

#[tokio::test]
async fn token_service_failure_surfaces_from_initialize() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new()
        .with_permissions(PermissionResponse::granted())
        .with_token_error("project id missing");
    let (bridge, _platform) = bridge_with(platform, delegate.clone());

    let err = bridge.initialize("user-1").await.unwrap_err();

    assert!(err
        .to_string()
        .starts_with("Failed to initialize notifications: project id missing"));
    assert!(!err.is_save_token());
    assert_eq!(bridge.permission_status(), Some(PermissionStatus::Granted));
    assert!(delegate.tokens().is_empty());
}

#[tokio::test]
async fn permission_query_failure_leaves_status_unset() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new().with_permission_error("permission service crashed");
    let (bridge, _platform) = bridge_with(platform, delegate);

    let err = bridge.initialize("user-1").await.unwrap_err();

    assert!(err.to_string().contains("permission service crashed"));
    assert_eq!(bridge.permission_status(), None);
}

#[tokio::test]
async fn android_channel_failure_aborts_initialize() {
    let delegate = RecordingDelegate::new();
    let platform = SimulatedPlatform::new()
        .with_os(PlatformOs::Android)
        .with_channel_error("channel rejected");
    let (bridge, platform) = bridge_with(platform, delegate);

    let err = bridge.initialize("user-1").await.unwrap_err();

    assert!(err.to_string().contains("channel rejected"));
    assert_eq!(platform.count(PlatformCall::GetPermissions), 0);
}

#[tokio::test]
async fn overlapping_initialize_calls_prompt_once() {
    let delegate = RecordingDelegate::new();
    let (bridge, platform) = bridge_with(SimulatedPlatform::new(), delegate.clone());

    let (first, second) =
        futures::future::join(bridge.initialize("user-1"), bridge.initialize("user-1")).await;
    first.unwrap();
    second.unwrap();

    assert_eq!(platform.count(PlatformCall::RequestPermissions), 1);
    assert_eq!(delegate.tokens().len(), 2);
}
