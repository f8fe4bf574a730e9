use crate::api_client::SyncClient;
use crate::domain::{
    FailedOperation, OfflineRecipe, OperationKind, PendingOperation, SyncStatus,
};
use crate::error::{Result, SyncError};
use crate::metrics::{MetricsCalculator, MetricsInput};
use crate::network;
use crate::offline_store::OfflineStore;
use crate::session::Session;
use crate::settings::Settings;
use brewlog_common::api::SaveRecipeRequest;
use brewlog_common::domain::{Recipe, RecipeDraft, RecipeMetrics, RecipePatch};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Attempts per entity before it drops out of automatic retries.
const MAX_RETRIES: u32 = 3;

/// How long an unconfirmed deletion intent is kept before it counts as
/// abandoned.
const TOMBSTONE_RETENTION: Duration = Duration::days(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SyncSummary {
    pub success: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SyncStatusReport {
    pub total_recipes: usize,
    pub pending_sync: usize,
    pub conflicts: usize,
    pub failed_sync: usize,
    pub last_sync: Option<OffsetDateTime>,
}

/// Offline-first recipe service. Every entry point reads the relevant
/// collection, mutates it in memory, and writes it back as one unit; the
/// single-writer assumption makes that sufficient.
pub struct OfflineRecipeService {
    settings: Settings,
    store: OfflineStore,
    client: SyncClient,
    session: Session,
}

impl OfflineRecipeService {
    pub fn new(
        settings: Settings,
        store: OfflineStore,
        client: SyncClient,
        session: Session,
    ) -> Self {
        Self {
            settings,
            store,
            client,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &OfflineStore {
        &self.store
    }

    pub async fn is_online(&self) -> bool {
        network::is_online(&self.settings, &self.client).await
    }

    /// All live recipes for the current scope. Online, the server list is
    /// the baseline and local unsynced work overlays it; offline or on
    /// fetch failure, the cache answers verbatim. A transient network error
    /// is never surfaced as a hard failure here.
    pub async fn get_all(&self) -> Result<Vec<OfflineRecipe>> {
        let scope = self.session.scope_id();

        if !self.is_online().await {
            debug!("get_all: offline, serving cache");
            let locals = self.store.load_recipes(scope).await?;
            return Ok(locals.into_iter().filter(|x| !x.is_tombstone()).collect());
        }

        match self.client.list().await {
            Ok(res) => {
                let merged = self.merge_server_list(scope, res.recipes).await?;
                Ok(merged.into_iter().filter(|x| !x.is_tombstone()).collect())
            }
            Err(err) => {
                warn!("get_all: remote list failed, serving cache: {err}");
                let locals = self.store.load_recipes(scope).await?;
                Ok(locals.into_iter().filter(|x| !x.is_tombstone()).collect())
            }
        }
    }

    /// Reconciles a fresh server listing with the cache and persists the
    /// result. Deletion intent always wins over a stale server read; local
    /// records with unsynced edits survive over the server's view.
    async fn merge_server_list(
        &self,
        scope: &str,
        server: Vec<Recipe>,
    ) -> Result<Vec<OfflineRecipe>> {
        let mut locals = self.store.load_recipes(scope).await?;
        let mut merged: Vec<OfflineRecipe> = Vec::with_capacity(server.len());

        for remote in server {
            let local = locals
                .iter()
                .position(|l| l.matches(&remote.id))
                .map(|pos| locals.remove(pos));

            match local {
                Some(local) if local.is_tombstone() => {
                    // Tombstone wins; the drain loop confirms the deletion.
                    merged.push(local);
                }
                Some(mut local) if local.sync.needs_sync => {
                    if remote.updated_at > local.recipe.updated_at {
                        // Both sides moved since the last known-good sync.
                        local.mark_conflict(remote);
                    }
                    merged.push(local);
                }
                _ => merged.push(OfflineRecipe::synced(remote)),
            }
        }

        // Whatever the server did not return: keep everything that still
        // carries local intent, drop clean synced copies the server no
        // longer has.
        for local in locals {
            if local.is_tombstone() || local.sync.needs_sync || local.is_offline() {
                merged.push(local);
            } else {
                debug!("dropping {}: no longer on server", local.recipe.id);
            }
        }

        self.store.save_recipes(scope, &merged).await?;
        let mut meta = self.store.load_meta(scope).await?;
        meta.last_sync = Some(OffsetDateTime::now_utc());
        meta.version.bump();
        self.store.save_meta(scope, &meta).await?;

        Ok(merged)
    }

    /// Cache first, remote only on a miss. "Not found" is a normal outcome
    /// for reads and comes back as `None`, never as an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<OfflineRecipe>> {
        let scope = self.session.scope_id();
        let mut locals = self.store.load_recipes(scope).await?;

        if let Some(local) = locals.iter().find(|l| l.matches(id)) {
            if local.is_tombstone() {
                return Ok(None);
            }
            return Ok(Some(local.clone()));
        }

        if !self.is_online().await {
            return Ok(None);
        }

        match self.client.get(id).await {
            Ok(Some(remote)) => {
                let offline = OfflineRecipe::synced(remote);
                locals.push(offline.clone());
                self.store.save_recipes(scope, &locals).await?;
                Ok(Some(offline))
            }
            Ok(None) => Ok(None),
            Err(err) if err.is_remote() => {
                debug!("get_by_id: remote lookup failed: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Creates remotely when possible; any remote failure or plain
    /// offlineness falls back to a local record carrying a temp id. The
    /// `needs_sync` flag on the record is what the drain loop picks up.
    pub async fn create(&self, draft: RecipeDraft) -> Result<OfflineRecipe> {
        let user_id = self.session.require_user()?.to_string();
        let scope = self.session.scope_id();
        let now = OffsetDateTime::now_utc();

        let recipe = Recipe {
            id: String::new(),
            user_id,
            name: draft.name,
            style: draft.style,
            batch_size: draft.batch_size,
            batch_size_unit: draft.batch_size_unit,
            boil_time: draft.boil_time,
            efficiency: draft.efficiency,
            ingredients: draft.ingredients,
            notes: draft.notes,
            metrics: RecipeMetrics::default(),
            created_at: now,
            updated_at: now,
        };

        let mut locals = self.store.load_recipes(scope).await?;

        if self.is_online().await {
            match self.client.create(&SaveRecipeRequest::from(&recipe)).await {
                Ok(remote) => {
                    let offline = OfflineRecipe::synced(remote);
                    locals.push(offline.clone());
                    self.store.save_recipes(scope, &locals).await?;
                    return Ok(offline);
                }
                Err(err) if err.is_remote() => {
                    warn!("create: remote failed, keeping local copy: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        let temp_id = Uuid::now_v7().to_string();
        let offline = OfflineRecipe::local_only(recipe.clone(), temp_id.clone());
        locals.push(offline.clone());
        self.store.save_recipes(scope, &locals).await?;

        let mut pending = self.store.load_pending(scope).await?;
        pending.push(PendingOperation::new(
            OperationKind::Create,
            temp_id,
            Some(recipe),
        ));
        self.store.save_pending(scope, &pending).await?;

        Ok(offline)
    }

    /// Mutating a nonexistent entity is a caller error, unlike reads.
    pub async fn update(&self, id: &str, patch: RecipePatch) -> Result<OfflineRecipe> {
        let scope = self.session.scope_id();
        let mut locals = self.store.load_recipes(scope).await?;

        let pos = locals
            .iter()
            .position(|l| l.matches(id) && !l.is_tombstone())
            .ok_or_else(|| SyncError::NotFound(id.to_string()))?;

        patch.apply(&mut locals[pos].recipe);
        locals[pos].mark_edited();

        if locals[pos].is_offline() {
            // Never confirmed server-side; nothing to update remotely yet.
            self.store.save_recipes(scope, &locals).await?;
            return Ok(locals[pos].clone());
        }

        if locals[pos].sync.status == SyncStatus::Conflict {
            // Edits pile onto the local side; pushing would auto-resolve
            // the conflict behind the caller's back.
            self.store.save_recipes(scope, &locals).await?;
            return Ok(locals[pos].clone());
        }

        let mut log_pending = true;
        if self.is_online().await {
            let payload = SaveRecipeRequest::from(&locals[pos].recipe);
            let server_id = locals[pos].recipe.id.clone();
            match self.client.update(&server_id, &payload).await {
                Ok(remote) => {
                    locals[pos].recipe = remote;
                    locals[pos].mark_synced();
                    log_pending = false;
                }
                Err(err) if err.is_remote() => {
                    warn!("update: remote failed, keeping local edit: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        self.store.save_recipes(scope, &locals).await?;

        if log_pending {
            let mut pending = self.store.load_pending(scope).await?;
            pending.push(PendingOperation::new(
                OperationKind::Update,
                locals[pos].recipe.id.clone(),
                Some(locals[pos].recipe.clone()),
            ));
            self.store.save_pending(scope, &pending).await?;
        }

        Ok(locals[pos].clone())
    }

    /// A record the server never saw is removed outright; anything else
    /// becomes a tombstone until the server confirms the deletion.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let scope = self.session.scope_id();
        let mut locals = self.store.load_recipes(scope).await?;

        let pos = locals
            .iter()
            .position(|l| l.matches(id))
            .ok_or_else(|| SyncError::NotFound(id.to_string()))?;

        if locals[pos].is_tombstone() {
            // Deletion already recorded.
            return Ok(());
        }

        if locals[pos].is_offline() {
            let removed = locals.remove(pos);
            self.store.save_recipes(scope, &locals).await?;

            let mut pending = self.store.load_pending(scope).await?;
            pending.retain(|op| !removed.matches(&op.recipe_id));
            self.store.save_pending(scope, &pending).await?;
            return Ok(());
        }

        if self.is_online().await {
            let server_id = locals[pos].recipe.id.clone();
            match self.client.delete(&server_id).await {
                Ok(()) => {
                    locals.remove(pos);
                    self.store.save_recipes(scope, &locals).await?;
                    return Ok(());
                }
                Err(err) if err.is_remote() => {
                    warn!("delete: remote failed, tombstoning: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        locals[pos].mark_tombstone();
        let recipe_id = locals[pos].recipe.id.clone();
        self.store.save_recipes(scope, &locals).await?;

        let mut pending = self.store.load_pending(scope).await?;
        pending.push(PendingOperation::new(OperationKind::Delete, recipe_id, None));
        self.store.save_pending(scope, &pending).await?;

        Ok(())
    }

    /// Drain loop. Walks every entity flagged `needs_sync` and dispatches
    /// the remote call its current state implies: create for temp-only
    /// records, delete for tombstones, update otherwise. Offline, this is a
    /// no-op; offline skips are not failures.
    pub async fn sync_pending_changes(&self, force: bool) -> Result<SyncSummary> {
        if !self.is_online().await {
            debug!("sync: offline, skipping drain");
            return Ok(SyncSummary::default());
        }

        let scope = self.session.scope_id();
        let mut locals = self.store.load_recipes(scope).await?;
        let mut pending = self.store.load_pending(scope).await?;
        let mut summary = SyncSummary::default();

        for rec in locals.iter_mut() {
            if !rec.sync.needs_sync {
                continue;
            }
            match rec.sync.status {
                // Conflicts wait for explicit resolution.
                SyncStatus::Conflict => continue,
                SyncStatus::Failed if !force => continue,
                SyncStatus::Failed => rec.sync.retry_count = 0,
                _ => {}
            }
            if !rec.is_tombstone() && !rec.recipe.has_syncable_ingredients() {
                debug!("sync: skipping record with unidentified ingredients");
                continue;
            }

            let kind;
            let outcome: Result<()> = if rec.is_tombstone() {
                kind = OperationKind::Delete;
                self.client.delete(&rec.recipe.id).await
            } else if rec.is_offline() {
                kind = OperationKind::Create;
                match self.client.create(&SaveRecipeRequest::from(&rec.recipe)).await {
                    Ok(remote) => {
                        let temp_id = rec.sync.temp_id.clone().unwrap_or_default();
                        for op in pending.iter_mut().filter(|op| op.recipe_id == temp_id) {
                            op.recipe_id = remote.id.clone();
                        }
                        rec.promote(remote);
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            } else {
                kind = OperationKind::Update;
                let server_id = rec.recipe.id.clone();
                match self
                    .client
                    .update(&server_id, &SaveRecipeRequest::from(&rec.recipe))
                    .await
                {
                    Ok(remote) => {
                        rec.recipe = remote;
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            };

            match outcome {
                Ok(()) => {
                    // Confirmed tombstones stay put with needs_sync cleared;
                    // cleanup_tombstones reaps them.
                    rec.mark_synced();
                    summary.success += 1;
                    let id = rec.recipe.id.clone();
                    pending.retain(|op| !(op.recipe_id == id && op.kind == kind));
                }
                Err(err) => {
                    summary.failed += 1;
                    rec.sync.retry_count += 1;
                    for op in pending.iter_mut().filter(|op| rec.matches(&op.recipe_id)) {
                        op.retry_count += 1;
                    }
                    if rec.sync.retry_count >= MAX_RETRIES {
                        warn!(
                            "sync: {} failed {} times, giving up: {err}",
                            rec.recipe.id, rec.sync.retry_count
                        );
                        rec.sync.status = SyncStatus::Failed;
                        self.store
                            .append_failed(
                                scope,
                                FailedOperation {
                                    kind,
                                    recipe_id: rec.recipe.id.clone(),
                                    error: err.to_string(),
                                    failed_at: OffsetDateTime::now_utc(),
                                    attempts: rec.sync.retry_count,
                                },
                            )
                            .await?;
                    } else {
                        debug!("sync: attempt {} failed: {err}", rec.sync.retry_count);
                        rec.sync.status = SyncStatus::Pending;
                    }
                }
            }
        }

        self.store.save_recipes(scope, &locals).await?;
        self.store.save_pending(scope, &pending).await?;

        let mut meta = self.store.load_meta(scope).await?;
        meta.last_sync = Some(OffsetDateTime::now_utc());
        meta.version.bump();
        self.store.save_meta(scope, &meta).await?;

        info!(
            "sync done: {} uploaded, {} failed",
            summary.success, summary.failed
        );
        Ok(summary)
    }

    pub async fn get_sync_status(&self) -> Result<SyncStatusReport> {
        let scope = self.session.scope_id();
        let locals = self.store.load_recipes(scope).await?;
        let meta = self.store.load_meta(scope).await?;

        Ok(SyncStatusReport {
            total_recipes: locals.iter().filter(|x| !x.is_tombstone()).count(),
            pending_sync: locals
                .iter()
                .filter(|x| x.sync.needs_sync && x.sync.status == SyncStatus::Pending)
                .count(),
            conflicts: locals
                .iter()
                .filter(|x| x.sync.status == SyncStatus::Conflict)
                .count(),
            failed_sync: locals
                .iter()
                .filter(|x| x.sync.status == SyncStatus::Failed)
                .count(),
            last_sync: meta.last_sync,
        })
    }

    /// Reaps tombstones whose deletion the server confirmed, plus any
    /// deletion intent old enough to count as abandoned.
    pub async fn cleanup_tombstones(&self) -> Result<usize> {
        let scope = self.session.scope_id();
        let mut locals = self.store.load_recipes(scope).await?;
        let before = locals.len();
        let cutoff = OffsetDateTime::now_utc() - TOMBSTONE_RETENTION;

        locals.retain(|l| {
            if !l.is_tombstone() {
                return true;
            }
            if !l.sync.needs_sync {
                return false;
            }
            match l.sync.deleted_at {
                Some(deleted_at) => deleted_at > cutoff,
                None => false,
            }
        });

        let removed = before - locals.len();
        if removed > 0 {
            debug!("cleanup: removed {removed} tombstones");
            self.store.save_recipes(scope, &locals).await?;
        }

        Ok(removed)
    }

    /// Drops records that lost their identity, unless the user is still
    /// trying to sync them; discarding in-flight work would be silent data
    /// loss. Also persists the pruning of records the lenient loader
    /// already refused to parse.
    pub async fn cleanup_stale_data(&self) -> Result<usize> {
        let scope = self.session.scope_id();
        let mut locals = self.store.load_recipes(scope).await?;
        let before = locals.len();

        locals.retain(|l| {
            l.sync.needs_sync
                || !(l.recipe.id.trim().is_empty() && l.recipe.name.trim().is_empty())
        });

        let removed = before - locals.len();
        if removed > 0 {
            debug!("cleanup: removed {removed} stale records");
        }
        self.store.save_recipes(scope, &locals).await?;

        Ok(removed)
    }

    /// Backfills metrics onto live records that have none. Tombstones and
    /// already-estimated records are skipped without counting as processed.
    pub async fn calculate_missing_metrics(
        &self,
        calc: &dyn MetricsCalculator,
    ) -> Result<usize> {
        let scope = self.session.scope_id();
        let mut locals = self.store.load_recipes(scope).await?;
        let mut processed = 0;

        for rec in locals.iter_mut() {
            if rec.is_tombstone() || !rec.recipe.metrics.is_empty() {
                continue;
            }
            rec.recipe.metrics = calc.compute(MetricsInput {
                batch_size: rec.recipe.batch_size,
                batch_size_unit: &rec.recipe.batch_size_unit,
                efficiency: rec.recipe.efficiency,
                ingredients: &rec.recipe.ingredients,
            });
            processed += 1;
        }

        if processed > 0 {
            self.store.save_recipes(scope, &locals).await?;
        }

        Ok(processed)
    }

    pub async fn clear_user_data(&self, user: Option<&str>) -> Result<()> {
        self.store.clear_user_data(user).await
    }
}
