mod helpers;

use brewlog_client::domain::{OfflineRecipe, SyncStatus};
use brewlog_client::error::SyncError;
use brewlog_client::offline_store::{failed_key, meta_key, pending_key, recipes_key};
use brewlog_common::domain::RecipePatch;
use fake::faker::lorem::en::Word;
use fake::Fake;
use helpers::{anonymous_offline_app, draft, offline_app, recipe, seed, CannedCalc, USER};
use time::{Duration, OffsetDateTime};

#[tokio::test]
async fn offline_create_round_trip() {
    let service = offline_app().await;

    let created = service.create(draft("Pale Ale")).await.unwrap();

    assert!(created.is_offline());
    assert_eq!(created.sync.status, SyncStatus::Pending);
    assert!(created.sync.needs_sync);
    assert!(created.recipe.id.is_empty());

    let temp_id = created.sync.temp_id.clone().expect("temp id assigned");
    let fetched = service.get_by_id(&temp_id).await.unwrap().unwrap();
    assert_eq!(fetched.recipe.name, "Pale Ale");
    assert_eq!(fetched.sync.temp_id, Some(temp_id));
}

#[tokio::test]
async fn offline_create_requires_a_user() {
    let service = anonymous_offline_app().await;

    let res = service.create(draft("Orphan Ale")).await;
    assert!(matches!(res, Err(SyncError::Unauthenticated)));
}

#[tokio::test]
async fn anonymous_reads_degrade_to_device_cache() {
    let service = anonymous_offline_app().await;
    let scope = service.session().scope_id().to_string();
    seed(&service, &scope, &[OfflineRecipe::synced(recipe("srv-1", "Saison"))]).await;

    let all = service.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].recipe.name, "Saison");
}

#[tokio::test]
async fn get_all_offline_excludes_tombstones() {
    let service = offline_app().await;
    let mut tombstone = OfflineRecipe::synced(recipe("srv-2", "Old Stout"));
    tombstone.mark_tombstone();
    seed(
        &service,
        USER,
        &[
            OfflineRecipe::synced(recipe("srv-1", "IPA")),
            tombstone,
            OfflineRecipe::synced(recipe("srv-3", "Lager")),
        ],
    )
    .await;

    let all = service.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|x| x.recipe.id != "srv-2"));
}

#[tokio::test]
async fn deleting_a_local_only_record_removes_it_completely() {
    let service = offline_app().await;
    let created = service.create(draft("Scratch Ale")).await.unwrap();
    let temp_id = created.sync.temp_id.clone().unwrap();

    service.delete(&temp_id).await.unwrap();

    assert!(service.get_by_id(&temp_id).await.unwrap().is_none());
    assert!(service.get_all().await.unwrap().is_empty());
    // Nothing left in the debug trail either.
    assert!(service.store().load_pending(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_synced_record_offline_leaves_a_tombstone() {
    let service = offline_app().await;
    seed(&service, USER, &[OfflineRecipe::synced(recipe("srv-1", "Porter"))]).await;

    service.delete("srv-1").await.unwrap();

    let stored = service.store().load_recipes(USER).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_tombstone());
    assert!(stored[0].sync.needs_sync);
    assert!(stored[0].sync.deleted_at.is_some());

    assert!(service.get_by_id("srv-1").await.unwrap().is_none());
    assert!(service.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_missing_record_is_an_error() {
    let service = offline_app().await;

    let res = service.delete("nope").await;
    assert!(matches!(res, Err(SyncError::NotFound(_))));
}

#[tokio::test]
async fn updating_a_missing_record_is_an_error() {
    let service = offline_app().await;

    let res = service.update("nope", RecipePatch::default()).await;
    assert!(matches!(res, Err(SyncError::NotFound(_))));
}

#[tokio::test]
async fn offline_update_marks_the_record_dirty() {
    let service = offline_app().await;
    seed(&service, USER, &[OfflineRecipe::synced(recipe("srv-1", "Porter"))]).await;

    let patch = RecipePatch {
        name: Some("Robust Porter".into()),
        ..Default::default()
    };
    let updated = service.update("srv-1", patch).await.unwrap();

    assert_eq!(updated.recipe.name, "Robust Porter");
    assert!(updated.sync.needs_sync);
    assert_eq!(updated.sync.status, SyncStatus::Pending);
}

#[tokio::test]
async fn sync_while_offline_is_a_noop() {
    let service = offline_app().await;
    let mut dirty = OfflineRecipe::synced(recipe("srv-1", "Porter"));
    dirty.mark_edited();
    seed(&service, USER, &[dirty]).await;

    let summary = service.sync_pending_changes(false).await.unwrap();

    assert_eq!(summary.success, 0);
    assert_eq!(summary.failed, 0);

    let stored = service.store().load_recipes(USER).await.unwrap();
    assert_eq!(stored[0].sync.retry_count, 0);
    assert!(stored[0].sync.needs_sync);
}

#[tokio::test]
async fn tombstone_cleanup_honors_the_retention_window() {
    let service = offline_app().await;

    let mut expired = OfflineRecipe::synced(recipe("srv-1", "Old One"));
    expired.mark_tombstone();
    expired.sync.deleted_at = Some(OffsetDateTime::now_utc() - Duration::days(31));

    let mut recent = OfflineRecipe::synced(recipe("srv-2", "Fresh One"));
    recent.mark_tombstone();
    recent.sync.deleted_at = Some(OffsetDateTime::now_utc() - Duration::days(29));

    let mut confirmed = OfflineRecipe::synced(recipe("srv-3", "Done One"));
    confirmed.mark_tombstone();
    confirmed.sync.needs_sync = false;

    seed(&service, USER, &[expired, recent, confirmed]).await;

    let removed = service.cleanup_tombstones().await.unwrap();
    assert_eq!(removed, 2);

    let stored = service.store().load_recipes(USER).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].recipe.id, "srv-2");
}

#[tokio::test]
async fn stale_cleanup_spares_records_awaiting_sync() {
    let service = offline_app().await;

    let mut identityless = OfflineRecipe::synced(recipe("", ""));
    identityless.sync.needs_sync = false;

    let mut identityless_but_dirty = OfflineRecipe::synced(recipe("", ""));
    identityless_but_dirty.sync.needs_sync = true;

    let keeper = OfflineRecipe::synced(recipe("srv-1", "Porter"));

    seed(
        &service,
        USER,
        &[identityless, identityless_but_dirty, keeper],
    )
    .await;

    let removed = service.cleanup_stale_data().await.unwrap();
    assert_eq!(removed, 1);

    let stored = service.store().load_recipes(USER).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn clear_user_data_scopes_to_the_given_user() {
    let service = offline_app().await;
    let store = service.store();

    // Four keys for user123, a neighbor user, and an unrelated key.
    store
        .save_recipes(USER, &[OfflineRecipe::synced(recipe("srv-1", "IPA"))])
        .await
        .unwrap();
    store.save_pending(USER, &[]).await.unwrap();
    store.save_meta(USER, &Default::default()).await.unwrap();
    store
        .kv()
        .set(&failed_key(USER), "[]")
        .await
        .unwrap();
    store
        .save_recipes("other", &[OfflineRecipe::synced(recipe("srv-9", "Wit"))])
        .await
        .unwrap();
    store.kv().set("app_cache", "keep me").await.unwrap();

    service.clear_user_data(Some(USER)).await.unwrap();

    let keys = store.kv().list_keys().await.unwrap();
    assert!(!keys.contains(&recipes_key(USER)));
    assert!(!keys.contains(&pending_key(USER)));
    assert!(!keys.contains(&meta_key(USER)));
    assert!(!keys.contains(&failed_key(USER)));
    assert!(keys.contains(&recipes_key("other")));
    assert!(keys.contains(&"app_cache".to_string()));

    service.clear_user_data(None).await.unwrap();

    let keys = store.kv().list_keys().await.unwrap();
    assert_eq!(keys, vec!["app_cache".to_string()]);
}

#[tokio::test]
async fn metrics_backfill_skips_tombstones_and_estimated_records() {
    let service = offline_app().await;

    let bare = OfflineRecipe::synced(recipe("srv-1", "Needs numbers"));

    let mut estimated = OfflineRecipe::synced(recipe("srv-2", "Has numbers"));
    estimated.recipe.metrics.estimated_abv = Some(6.3);

    let mut tombstone = OfflineRecipe::synced(recipe("srv-3", "Gone"));
    tombstone.mark_tombstone();

    seed(&service, USER, &[bare, estimated, tombstone]).await;

    let processed = service.calculate_missing_metrics(&CannedCalc).await.unwrap();
    assert_eq!(processed, 1);

    let stored = service.store().load_recipes(USER).await.unwrap();
    let filled = stored.iter().find(|x| x.recipe.id == "srv-1").unwrap();
    assert_eq!(filled.recipe.metrics.estimated_og, Some(1.050));

    let untouched = stored.iter().find(|x| x.recipe.id == "srv-2").unwrap();
    assert_eq!(untouched.recipe.metrics.estimated_abv, Some(6.3));
    assert!(untouched.recipe.metrics.estimated_og.is_none());
}

#[tokio::test]
async fn sync_status_counts_by_lifecycle_state() {
    let service = offline_app().await;

    let clean = OfflineRecipe::synced(recipe("srv-1", Word().fake::<String>().as_str()));

    let mut dirty = OfflineRecipe::synced(recipe("srv-2", "Dirty"));
    dirty.mark_edited();

    let mut conflicted = OfflineRecipe::synced(recipe("srv-3", "Conflicted"));
    conflicted.mark_edited();
    conflicted.mark_conflict(recipe("srv-3", "Server copy"));

    let mut failed = OfflineRecipe::synced(recipe("srv-4", "Failed"));
    failed.mark_edited();
    failed.sync.status = SyncStatus::Failed;
    failed.sync.retry_count = 3;

    seed(&service, USER, &[clean, dirty, conflicted, failed]).await;

    let report = service.get_sync_status().await.unwrap();
    assert_eq!(report.total_recipes, 4);
    assert_eq!(report.pending_sync, 1);
    assert_eq!(report.conflicts, 1);
    assert_eq!(report.failed_sync, 1);
    assert!(report.last_sync.is_none());
}
