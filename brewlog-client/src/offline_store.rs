use crate::domain::{FailedOperation, OfflineRecipe, PendingOperation};
use crate::error::Result;
use crate::store::KvStore;
use brewlog_common::domain::StateVersion;
use time::OffsetDateTime;
use tracing::{debug, warn};

pub const KEY_PREFIX: &str = "offline_recipes";

/// Storage-key derivation is a pure function of the explicit scope id.
pub fn recipes_key(scope: &str) -> String {
    format!("{KEY_PREFIX}_{scope}")
}

pub fn pending_key(scope: &str) -> String {
    format!("{KEY_PREFIX}_{scope}_pending")
}

pub fn meta_key(scope: &str) -> String {
    format!("{KEY_PREFIX}_{scope}_meta")
}

pub fn failed_key(scope: &str) -> String {
    format!("{KEY_PREFIX}_{scope}_pending_failed")
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct OfflineMeta {
    pub last_sync: Option<OffsetDateTime>,
    #[serde(default)]
    pub version: StateVersion,
}

/// Owns the per-user cached collections. The aggregate is split over
/// separate keys (recipes / pending log / meta / failed log) so a crash
/// between writes leaves at most one sub-collection stale instead of
/// corrupting the whole state.
pub struct OfflineStore {
    kv: KvStore,
}

impl OfflineStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Loads the cached collection, dropping records that no longer parse.
    /// A record the user is trying to sync is worth more than structural
    /// purity, but an unreadable record cannot be resurrected either way;
    /// the whole-blob case still fails loudly.
    pub async fn load_recipes(&self, scope: &str) -> Result<Vec<OfflineRecipe>> {
        let raw = match self.kv.get(&recipes_key(scope)).await? {
            Some(v) => v,
            None => return Ok(vec![]),
        };

        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        let mut recipes = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<OfflineRecipe>(value) {
                Ok(recipe) => recipes.push(recipe),
                Err(err) => warn!("dropping corrupt cached recipe: {err}"),
            }
        }

        Ok(recipes)
    }

    pub async fn save_recipes(&self, scope: &str, recipes: &[OfflineRecipe]) -> Result<()> {
        debug!("saving {} cached recipes for {scope}", recipes.len());
        let value = serde_json::to_string(recipes)?;
        self.kv.set(&recipes_key(scope), &value).await
    }

    pub async fn load_pending(&self, scope: &str) -> Result<Vec<PendingOperation>> {
        let raw = match self.kv.get(&pending_key(scope)).await? {
            Some(v) => v,
            None => return Ok(vec![]),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn save_pending(&self, scope: &str, ops: &[PendingOperation]) -> Result<()> {
        let value = serde_json::to_string(ops)?;
        self.kv.set(&pending_key(scope), &value).await
    }

    pub async fn load_meta(&self, scope: &str) -> Result<OfflineMeta> {
        let raw = match self.kv.get(&meta_key(scope)).await? {
            Some(v) => v,
            None => return Ok(OfflineMeta::default()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn save_meta(&self, scope: &str, meta: &OfflineMeta) -> Result<()> {
        let value = serde_json::to_string(meta)?;
        self.kv.set(&meta_key(scope), &value).await
    }

    pub async fn load_failed(&self, scope: &str) -> Result<Vec<FailedOperation>> {
        let raw = match self.kv.get(&failed_key(scope)).await? {
            Some(v) => v,
            None => return Ok(vec![]),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn append_failed(&self, scope: &str, op: FailedOperation) -> Result<()> {
        let mut failed = self.load_failed(scope).await?;
        failed.push(op);
        let value = serde_json::to_string(&failed)?;
        self.kv.set(&failed_key(scope), &value).await
    }

    /// Removes the four keys scoped to `user`, or with no user every key
    /// under the offline-recipe prefix across all users.
    pub async fn clear_user_data(&self, user: Option<&str>) -> Result<()> {
        let keys = match user {
            Some(scope) => vec![
                recipes_key(scope),
                pending_key(scope),
                meta_key(scope),
                failed_key(scope),
            ],
            None => {
                let prefix = format!("{KEY_PREFIX}_");
                self.kv
                    .list_keys()
                    .await?
                    .into_iter()
                    .filter(|key| key.starts_with(&prefix))
                    .collect()
            }
        };

        debug!("clearing {} offline keys", keys.len());
        self.kv.remove_many(&keys).await
    }
}
