use brewlog_common::domain::Recipe;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err("Failed to parse OperationKind from string".into()),
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row per user intent that could not be confirmed against the server.
///
/// The drain loop dispatches from the entity's own `needs_sync` flag, never
/// from this log; the log is a debug/compatibility trail of what happened
/// while offline, retargeted when a temp id gets promoted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PendingOperation {
    pub id: String,
    pub kind: OperationKind,
    pub recipe_id: String,
    pub data: Option<Recipe>,
    pub timestamp: OffsetDateTime,
    pub retry_count: u32,
}

impl PendingOperation {
    pub fn new(kind: OperationKind, recipe_id: String, data: Option<Recipe>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            kind,
            recipe_id,
            data,
            timestamp: OffsetDateTime::now_utc(),
            retry_count: 0,
        }
    }
}

/// Record of an operation that exhausted its retries.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FailedOperation {
    pub kind: OperationKind,
    pub recipe_id: String,
    pub error: String,
    pub failed_at: OffsetDateTime,
    pub attempts: u32,
}
