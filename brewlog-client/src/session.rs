use crate::error::{Result, SyncError};
use crate::settings::Settings;

/// Contents of the session file written by `account login`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredSession {
    pub user_id: String,
    pub token: String,
}

/// Explicit user scope threaded into the engine. Storage keys derive from
/// this, never from ambient state.
///
/// An unauthenticated session still has a stable device id so reads keep
/// working against a device-scoped cache; only creation demands a real user
/// (a record that cannot be attributed to a user can never be synced).
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Option<String>,
    pub token: Option<String>,
    pub device_id: String,
}

impl Session {
    pub fn load(settings: &Settings) -> Self {
        let device_id = Settings::device_id();
        match settings.session() {
            Some(stored) => Self {
                user_id: Some(stored.user_id),
                token: Some(stored.token),
                device_id,
            },
            None => Self {
                user_id: None,
                token: None,
                device_id,
            },
        }
    }

    /// The id all storage keys are scoped by: the user id when logged in,
    /// the device id otherwise.
    pub fn scope_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(&self.device_id)
    }

    pub fn require_user(&self) -> Result<&str> {
        self.user_id.as_deref().ok_or(SyncError::Unauthenticated)
    }
}
