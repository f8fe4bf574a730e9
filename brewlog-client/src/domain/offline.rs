use brewlog_common::domain::Recipe;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
    Conflict,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Conflict => "conflict",
            SyncStatus::Failed => "failed",
        }
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "conflict" => Ok(Self::Conflict),
            "failed" => Ok(Self::Failed),
            _ => Err("Failed to parse SyncStatus from string".into()),
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sync metadata carried next to the domain fields. Field presence follows
/// the lifecycle, not whatever happened to be written at creation time:
/// `temp_id` only while the entity was never confirmed by the server,
/// `original` only while `status == Conflict`, `deleted_at` only on
/// tombstones.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SyncEnvelope {
    /// Client-generated identity for an entity the server has never seen.
    pub temp_id: Option<String>,
    /// Former temp id kept as a lookup alias after identity promotion, so
    /// callers still holding the temp id keep resolving the record.
    #[serde(default)]
    pub promoted_from: Option<String>,
    /// Bumped on every local mutation; merge tie-breaker.
    pub last_modified: OffsetDateTime,
    pub status: SyncStatus,
    /// True whenever the local copy diverges from the last known server
    /// copy.
    pub needs_sync: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub deleted_at: Option<OffsetDateTime>,
    /// Server copy captured when a conflict was detected, for surfacing.
    pub original: Option<Recipe>,
    #[serde(default)]
    pub retry_count: u32,
}

/// A cached recipe plus its sync envelope.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OfflineRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub sync: SyncEnvelope,
}

impl OfflineRecipe {
    /// Entity confirmed by the server; synced from birth.
    pub fn synced(recipe: Recipe) -> Self {
        Self {
            recipe,
            sync: SyncEnvelope {
                temp_id: None,
                promoted_from: None,
                last_modified: OffsetDateTime::now_utc(),
                status: SyncStatus::Synced,
                needs_sync: false,
                is_deleted: false,
                deleted_at: None,
                original: None,
                retry_count: 0,
            },
        }
    }

    /// Entity born offline; pending from birth, identified by `temp_id`
    /// until the server assigns a real id.
    pub fn local_only(recipe: Recipe, temp_id: String) -> Self {
        Self {
            recipe,
            sync: SyncEnvelope {
                temp_id: Some(temp_id),
                promoted_from: None,
                last_modified: OffsetDateTime::now_utc(),
                status: SyncStatus::Pending,
                needs_sync: true,
                is_deleted: false,
                deleted_at: None,
                original: None,
                retry_count: 0,
            },
        }
    }

    /// Lookup by server id, temp id, or pre-promotion temp id.
    pub fn matches(&self, id: &str) -> bool {
        if !self.recipe.id.is_empty() && self.recipe.id == id {
            return true;
        }
        if self.sync.temp_id.as_deref() == Some(id) {
            return true;
        }
        self.sync.promoted_from.as_deref() == Some(id)
    }

    /// True while the entity exists only on this device.
    pub fn is_offline(&self) -> bool {
        self.sync.temp_id.is_some()
    }

    pub fn is_tombstone(&self) -> bool {
        self.sync.is_deleted
    }

    pub fn mark_edited(&mut self) {
        self.sync.last_modified = OffsetDateTime::now_utc();
        self.sync.needs_sync = true;
        if self.sync.status != SyncStatus::Conflict {
            self.sync.status = SyncStatus::Pending;
        }
    }

    pub fn mark_synced(&mut self) {
        self.sync.needs_sync = false;
        self.sync.status = SyncStatus::Synced;
        self.sync.retry_count = 0;
        self.sync.original = None;
    }

    /// Converts the record into a deletion intent that survives until the
    /// server confirms it.
    pub fn mark_tombstone(&mut self) {
        let now = OffsetDateTime::now_utc();
        self.sync.is_deleted = true;
        self.sync.deleted_at = Some(now);
        self.sync.last_modified = now;
        self.sync.needs_sync = true;
        self.sync.status = SyncStatus::Pending;
        self.sync.original = None;
    }

    /// Identity promotion: the server assigned a real id, so the record is
    /// re-keyed under it. The old temp id stays reachable as an alias.
    pub fn promote(&mut self, server: Recipe) {
        self.sync.promoted_from = self.sync.temp_id.take();
        self.recipe = server;
        self.mark_synced();
    }

    pub fn mark_conflict(&mut self, server: Recipe) {
        self.sync.status = SyncStatus::Conflict;
        self.sync.original = Some(server);
    }
}
