use reqwest::StatusCode;

/// Failure taxonomy for the sync engine.
///
/// Remote-class errors always have an offline fallback and must never reach
/// the caller from a path that can degrade to the local cache. Storage
/// errors are fatal to the current call: a swallowed failed write would
/// leave memory and disk silently diverged.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt offline state: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Remote request failed: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Remote service error: status {0}")]
    RemoteStatus(StatusCode),

    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("Invalid recipe: {0}")]
    Validation(&'static str),

    #[error("Not logged in")]
    Unauthenticated,
}

impl SyncError {
    /// True for failures that the offline path recovers from.
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Remote(_) | SyncError::RemoteStatus(_))
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
