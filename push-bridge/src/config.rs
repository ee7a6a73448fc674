use crate::types::{
    NotificationBehavior, NotificationChannel, PushTokenOptions, DEFAULT_CHANNEL_ID,
};
use anyhow::{anyhow, Context, Result};
use log::info as log_info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the project id push tokens are scoped to
pub const PROJECT_ID_ENV: &str = "EXPO_PUBLIC_EAS_PROJECT_ID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Project the push tokens are issued for
    pub project_id: Option<String>,

    /// Id of the Android channel ensured on every initialization
    pub channel_id: String,

    /// Configuration of that channel
    pub channel: NotificationChannel,

    /// Presentation policy for notifications arriving while the app runs
    pub notification_behavior: NotificationBehavior,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            channel: NotificationChannel::default(),
            notification_behavior: NotificationBehavior::default(),
        }
    }
}

impl BridgeConfig {
    /// Defaults with the project id taken from the process environment
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load a JSON config file, falling back to the environment for a missing project id
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read bridge config {}", path.display()))?;
        let config: BridgeConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid bridge config {}", path.display()))?;

        let config = config.with_env_overrides(|key| std::env::var(key).ok());
        validate_config(&config)?;

        log_info!("Loaded bridge config from {}", path.display());
        Ok(config)
    }

    /// Fill a missing project id from `lookup`; a configured one is kept
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.project_id.is_none() {
            self.project_id = lookup(PROJECT_ID_ENV).filter(|id| !id.trim().is_empty());
        }
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn push_token_options(&self) -> PushTokenOptions {
        PushTokenOptions {
            project_id: self.project_id.clone(),
        }
    }
}

/// Validate a bridge config
pub fn validate_config(config: &BridgeConfig) -> Result<()> {
    if config.channel_id.trim().is_empty() {
        return Err(anyhow!("Notification channel id cannot be empty"));
    }

    if config.channel.vibration_pattern.len() > 64 {
        return Err(anyhow!("Vibration pattern cannot have more than 64 steps"));
    }

    Ok(())
}
