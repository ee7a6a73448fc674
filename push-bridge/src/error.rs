use thiserror::Error;

/// Failures surfaced by the bridge, tagged with the phase that failed
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Registration or token persistence failed during `initialize`
    #[error("Failed to initialize notifications: {0}")]
    Initialize(#[source] anyhow::Error),

    /// The host's persistence callback rejected the token
    #[error("Failed to save token: {0}")]
    SaveToken(#[source] anyhow::Error),

    #[error("Error sending local notification: {0}")]
    SendLocalNotification(#[source] anyhow::Error),
}

impl BridgeError {
    /// True when the failure, possibly wrapped in `Initialize`, came from token persistence
    pub fn is_save_token(&self) -> bool {
        match self {
            BridgeError::SaveToken(_) => true,
            BridgeError::Initialize(inner) => inner
                .downcast_ref::<BridgeError>()
                .map_or(false, BridgeError::is_save_token),
            BridgeError::SendLocalNotification(_) => false,
        }
    }
}

pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
