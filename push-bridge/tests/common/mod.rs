#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use push_bridge::{
    BridgeConfig, Notification, NotificationBridge, NotificationDelegate, NotificationResponse,
    PushToken, SimulatedPlatform,
};
use std::sync::{Arc, Mutex};

/// Delegate that records everything the bridge hands it
#[derive(Default)]
pub struct RecordingDelegate {
    persist_error: Option<String>,
    record_responses: bool,
    pub tokens: Mutex<Vec<String>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub responses: Mutex<Vec<NotificationResponse>>,
}

impl RecordingDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            persist_error: Some(message.to_string()),
            ..Self::default()
        })
    }

    pub fn with_responses() -> Arc<Self> {
        Arc::new(Self {
            record_responses: true,
            ..Self::default()
        })
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn notification_titles(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.content().title.clone())
            .collect()
    }

    pub fn response_count(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationDelegate for RecordingDelegate {
    async fn persist_token(&self, token: &PushToken) -> Result<()> {
        self.tokens.lock().unwrap().push(token.to_string());
        match &self.persist_error {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }

    fn on_notification(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn on_notification_response(&self, response: NotificationResponse) {
        if self.record_responses {
            self.responses.lock().unwrap().push(response);
        }
    }
}

pub fn bridge_with(
    platform: SimulatedPlatform,
    delegate: Arc<RecordingDelegate>,
) -> (NotificationBridge<SimulatedPlatform>, Arc<SimulatedPlatform>) {
    let platform = Arc::new(platform);
    let bridge = NotificationBridge::new(
        Arc::clone(&platform),
        delegate,
        BridgeConfig::default().with_project_id("proj-test"),
    );
    (bridge, platform)
}
