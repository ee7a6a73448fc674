use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use log::{error as log_error, info as log_info, warn as log_warn};
use push_bridge::{
    configure_notification_handler, BridgeConfig, BridgeState, Notification, NotificationBridge,
    NotificationContent, NotificationData, NotificationDelegate, NotificationResponse,
    PermissionResponse, PlatformOs, PushToken, SimulatedPlatform,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OsArg {
    Android,
    Ios,
    Web,
    Desktop,
}

impl From<OsArg> for PlatformOs {
    fn from(os: OsArg) -> Self {
        match os {
            OsArg::Android => PlatformOs::Android,
            OsArg::Ios => PlatformOs::Ios,
            OsArg::Web => PlatformOs::Web,
            OsArg::Desktop => PlatformOs::Desktop,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PermissionArg {
    Granted,
    Undetermined,
    Denied,
}

impl From<PermissionArg> for PermissionResponse {
    fn from(permission: PermissionArg) -> Self {
        match permission {
            PermissionArg::Granted => PermissionResponse::granted(),
            PermissionArg::Undetermined => PermissionResponse::askable(),
            PermissionArg::Denied => PermissionResponse::blocked(),
        }
    }
}

/// Drive a notification bridge over a simulated device with JSON lines on stdin/stdout
#[derive(Debug, Parser)]
#[command(name = "push-helper", version)]
struct Args {
    /// Platform family to simulate
    #[arg(long, value_enum, default_value = "ios")]
    os: OsArg,

    /// Simulate an emulator instead of a physical device
    #[arg(long)]
    emulator: bool,

    /// Permission state before any prompt
    #[arg(long, value_enum, default_value = "undetermined")]
    permission: PermissionArg,

    /// What the simulated user answers when prompted
    #[arg(long, value_enum, default_value = "granted")]
    prompt: PermissionArg,

    /// Push token the simulated token service issues
    #[arg(long)]
    token: Option<String>,

    /// File the persisted push token is written to
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Bridge config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project id for token requests, overrides config and environment
    #[arg(long)]
    project_id: Option<String>,
}

impl Args {
    fn platform(&self) -> SimulatedPlatform {
        let platform = SimulatedPlatform::new()
            .with_os(self.os.into())
            .with_physical_device(!self.emulator)
            .with_permissions(self.permission.into())
            .with_prompt_result(self.prompt.into());

        match &self.token {
            Some(token) => platform.with_token(token.clone()),
            None => platform,
        }
    }

    async fn config(&self) -> Result<BridgeConfig> {
        let config = match &self.config {
            Some(path) => BridgeConfig::load(path).await?,
            None => BridgeConfig::from_env(),
        };

        Ok(match &self.project_id {
            Some(project_id) => config.with_project_id(project_id.clone()),
            None => config,
        })
    }
}

// ============================================================================
// Protocol Messages (JSON over stdin/stdout)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Request {
    Initialize {
        identifier: String,
    },
    SendLocal {
        title: String,
        body: String,
        data: Option<NotificationData>,
    },
    /// Simulate an incoming push
    Deliver {
        title: String,
        body: String,
        data: Option<NotificationData>,
    },
    /// Simulate the user tapping the last delivered notification
    Respond {
        action_identifier: Option<String>,
    },
    Status,
    Activate,
    Deactivate,
    Ping,
    Shutdown,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Response {
    Ok,
    Status { state: BridgeState, active: bool },
    Notification { notification: Notification },
    Error { message: String },
    Pong,
    Goodbye,
}

fn send_response(response: &Response) -> Result<()> {
    let json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()?;
    Ok(())
}

// ============================================================================
// Delegate
// ============================================================================

/// Writes tokens to a file and echoes received notifications to stdout
struct HelperDelegate {
    token_file: Option<PathBuf>,
}

#[async_trait]
impl NotificationDelegate for HelperDelegate {
    async fn persist_token(&self, token: &PushToken) -> Result<()> {
        match &self.token_file {
            Some(path) => {
                tokio::fs::write(path, token.as_str())
                    .await
                    .with_context(|| format!("Failed to write token to {}", path.display()))?;
                log_info!("Saved push token to {}", path.display());
            }
            None => log_info!("Push token: {}", token),
        }
        Ok(())
    }

    fn on_notification(&self, notification: Notification) {
        if let Err(e) = send_response(&Response::Notification { notification }) {
            log_error!("Failed to forward notification: {}", e);
        }
    }
}

// ============================================================================
// Main Loop
// ============================================================================

struct Session {
    bridge: NotificationBridge<SimulatedPlatform>,
    last_delivered: Option<Notification>,
}

impl Session {
    async fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Initialize { identifier } => match self.bridge.initialize(&identifier).await {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error {
                    message: e.to_string(),
                },
            },
            Request::SendLocal { title, body, data } => {
                match self.bridge.send_local_notification(&title, &body, data).await {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::Deliver { title, body, data } => {
                let content =
                    NotificationContent::new(title, body).with_data(data.unwrap_or_default());
                let notification = self.bridge.platform().deliver(content);
                self.last_delivered = Some(notification);
                Response::Ok
            }
            Request::Respond { action_identifier } => {
                match self.last_delivered.clone() {
                    Some(notification) => {
                        let mut response = NotificationResponse::default_action(notification);
                        if let Some(action) = action_identifier {
                            response.action_identifier = action;
                        }
                        self.bridge.platform().respond(response);
                        Response::Ok
                    }
                    None => Response::Error {
                        message: "No notification has been delivered yet".to_string(),
                    },
                }
            }
            Request::Status => Response::Status {
                state: self.bridge.state(),
                active: self.bridge.is_active(),
            },
            Request::Activate => {
                self.bridge.activate();
                Response::Ok
            }
            Request::Deactivate => {
                self.bridge.deactivate();
                Response::Ok
            }
            Request::Ping => Response::Pong,
            Request::Shutdown => Response::Goodbye,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = args.config().await?;
    let platform = Arc::new(args.platform());

    configure_notification_handler(platform.as_ref(), config.notification_behavior);

    let delegate = Arc::new(HelperDelegate {
        token_file: args.token_file.clone(),
    });
    let mut session = Session {
        bridge: NotificationBridge::new(platform, delegate, config),
        last_delivered: None,
    };
    session.bridge.activate();

    log_info!("push-helper ready ({:?}, emulator: {})", args.os, args.emulator);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                log_info!("EOF received, shutting down");
                break;
            }
            Err(e) => {
                log_error!("Error reading stdin: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Request>(line) {
            Ok(Request::Shutdown) => {
                log_info!("Shutdown requested");
                send_response(&Response::Goodbye)?;
                break;
            }
            Ok(request) => {
                let response = session.handle(request).await;
                send_response(&response)?;
            }
            Err(e) => {
                log_warn!("Failed to parse request: {}", e);
                send_response(&Response::Error {
                    message: format!("Invalid request: {}", e),
                })?;
            }
        }
    }

    session.bridge.deactivate();
    log_info!("push-helper exiting");
    Ok(())
}
