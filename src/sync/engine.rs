// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record synchronization engine.
//!
//! The engine owns the record collection and drives each record's status
//! through `pending -> synced | failed`. Scheduling rules:
//!
//! - at most one attempt is outstanding per record; a second request
//!   while one is in flight is dropped, not queued
//! - a `synced` record is never re-synced implicitly
//! - a `failed` record re-enters the state machine only through an
//!   explicit new request
//! - attempts across different records are independent and may resolve
//!   in any order; bulk sync has no barrier and partial completion is a
//!   normal outcome
//!
//! Every attempt is bounded by a timeout and resolves to `failed` when it
//! elapses, so a record can never stay `pending` forever.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::models::{CreateRecordRequest, ParcelRecord, RecordField, SyncStatus};
use crate::storage::RecordRepository;

use super::selection::SelectionSet;
use super::target::{SyncOutcome, SyncTarget};

/// Client-side engine reconciling locally-authored records with the
/// remote registry. Cheap to clone; clones share one collection.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    records: RwLock<HashMap<String, ParcelRecord>>,
    in_flight: Mutex<HashSet<String>>,
    selection: Mutex<SelectionSet>,
    repo: RecordRepository,
    target: Option<Arc<dyn SyncTarget>>,
    attempt_timeout: Duration,
}

impl SyncEngine {
    /// Create an engine over the given store and sync target.
    ///
    /// `target` is `None` when no sync capability is configured; the
    /// engine then drops every scheduling request.
    pub fn new(
        repo: RecordRepository,
        target: Option<Arc<dyn SyncTarget>>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                records: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashSet::new()),
                selection: Mutex::new(SelectionSet::new()),
                repo,
                target,
                attempt_timeout,
            }),
        }
    }

    /// Restore the collection from the local store.
    ///
    /// Called once at startup, before the engine serves requests.
    pub async fn load_from_store(&self) -> crate::storage::StorageResult<usize> {
        let loaded = self.inner.repo.load_all()?;
        let count = loaded.len();

        let mut records = self.inner.records.write().await;
        records.clear();
        for record in loaded {
            records.insert(record.id.clone(), record);
        }
        Ok(count)
    }

    /// Snapshot of the collection, sorted by id.
    pub async fn list(&self) -> Vec<ParcelRecord> {
        let records = self.inner.records.read().await;
        let mut all: Vec<ParcelRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub async fn get(&self, record_id: &str) -> Option<ParcelRecord> {
        self.inner.records.read().await.get(record_id).cloned()
    }

    /// Author a new record.
    ///
    /// Assigns a fresh id (never reused), starts it `pending`, and writes
    /// through to the store.
    pub async fn create(&self, request: CreateRecordRequest) -> ParcelRecord {
        let record = ParcelRecord {
            id: uuid::Uuid::new_v4().to_string(),
            avatar: request.avatar.unwrap_or_default(),
            address: request.address,
            certificate_number: request.certificate_number,
            owner: request.owner,
            sync_status: SyncStatus::Pending,
        };

        let mut records = self.inner.records.write().await;
        records.insert(record.id.clone(), record.clone());
        self.inner.persist(&record);

        debug!(record_id = %record.id, "Record created");
        record
    }

    /// Mutate one field of an existing record in place.
    ///
    /// Never touches `sync_status`. Returns `false` (silent no-op) for
    /// unknown ids.
    pub async fn update_field(&self, record_id: &str, field: RecordField, value: String) -> bool {
        let mut records = self.inner.records.write().await;
        let Some(record) = records.get_mut(record_id) else {
            return false;
        };

        match field {
            RecordField::Avatar => record.avatar = value,
            RecordField::Address => record.address = value,
            RecordField::CertificateNumber => record.certificate_number = value,
            RecordField::Owner => record.owner = value,
        }
        self.inner.persist(record);
        true
    }

    /// Schedule one asynchronous reconciliation attempt for a record.
    ///
    /// Returns whether an attempt was scheduled. Dropped (not queued)
    /// when the id is unknown, the record is already `synced`, an
    /// attempt is already outstanding for it, or no sync capability is
    /// configured.
    pub async fn request_sync(&self, record_id: &str) -> bool {
        let Some(target) = self.inner.target.clone() else {
            debug!(record_id, "Sync requested without a configured target; dropped");
            return false;
        };

        let snapshot = {
            let mut in_flight = self.inner.in_flight.lock().await;
            let mut records = self.inner.records.write().await;

            let Some(record) = records.get_mut(record_id) else {
                return false;
            };
            if record.sync_status == SyncStatus::Synced {
                return false;
            }
            if !in_flight.insert(record_id.to_string()) {
                debug!(record_id, "Sync attempt already in flight; dropped");
                return false;
            }

            record.sync_status = SyncStatus::Pending;
            self.inner.persist(record);
            record.clone()
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_attempt(target, snapshot).await;
        });
        true
    }

    /// Schedule independent attempts for a set of ids.
    ///
    /// No barrier, no all-or-nothing guarantee; returns how many
    /// attempts were actually scheduled.
    pub async fn request_sync_many(&self, record_ids: &[String]) -> usize {
        let mut scheduled = 0;
        for record_id in record_ids {
            if self.request_sync(record_id).await {
                scheduled += 1;
            }
        }
        scheduled
    }

    /// Schedule attempts for the current selection, then drop it.
    pub async fn sync_selection(&self) -> usize {
        let ids = {
            let mut selection = self.inner.selection.lock().await;
            let ids = selection.ids();
            selection.clear();
            ids
        };
        self.request_sync_many(&ids).await
    }

    // ========== Selection ==========

    /// Register a press on a record (see [`SelectionSet::press`]).
    pub async fn press(&self, record_id: &str, held: Duration) -> bool {
        self.inner.selection.lock().await.press(record_id, held)
    }

    /// Toggle selection membership of one record.
    pub async fn toggle_selection(&self, record_id: &str) {
        self.inner.selection.lock().await.toggle(record_id);
    }

    /// Replace the selection with an explicit id set.
    pub async fn bulk_select(&self, record_ids: Vec<String>) {
        self.inner.selection.lock().await.bulk_select(record_ids);
    }

    /// Sorted snapshot of the selected ids.
    pub async fn selected_ids(&self) -> Vec<String> {
        self.inner.selection.lock().await.ids()
    }

    /// Whether multi-select mode is active.
    pub async fn is_multi_select(&self) -> bool {
        self.inner.selection.lock().await.is_multi_select()
    }
}

impl EngineInner {
    /// Resolve one attempt and commit the terminal status.
    async fn run_attempt(self: Arc<Self>, target: Arc<dyn SyncTarget>, record: ParcelRecord) {
        let outcome = match tokio::time::timeout(
            self.attempt_timeout,
            target.attempt_sync(&record),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    record_id = %record.id,
                    timeout_secs = self.attempt_timeout.as_secs(),
                    "Sync attempt timed out"
                );
                SyncOutcome::Failed
            }
        };

        let status = match outcome {
            SyncOutcome::Synced => SyncStatus::Synced,
            SyncOutcome::Failed => SyncStatus::Failed,
        };

        {
            let mut in_flight = self.in_flight.lock().await;
            let mut records = self.records.write().await;
            if let Some(current) = records.get_mut(&record.id) {
                current.sync_status = status;
                self.persist(current);
            }
            in_flight.remove(&record.id);
        }

        info!(record_id = %record.id, status = ?status, "Sync attempt resolved");
    }

    /// Write a record through to the local store.
    ///
    /// Engine operations are local-memory operations and never surface
    /// persistence problems to callers; a failed write is logged and the
    /// in-memory state stays authoritative.
    fn persist(&self, record: &ParcelRecord) {
        if let Err(e) = self.repo.save(record) {
            warn!(record_id = %record.id, error = %e, "Failed to persist record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStorage, StoragePaths};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Target that counts calls and holds every attempt open until
    /// released.
    struct GatedTarget {
        calls: AtomicUsize,
        release: Notify,
    }

    impl GatedTarget {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl SyncTarget for GatedTarget {
        async fn attempt_sync(&self, _record: &ParcelRecord) -> SyncOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            SyncOutcome::Synced
        }
    }

    /// Target that replays a scripted sequence of outcomes.
    struct ScriptedTarget {
        outcomes: std::sync::Mutex<VecDeque<SyncOutcome>>,
    }

    impl ScriptedTarget {
        fn new(outcomes: impl IntoIterator<Item = SyncOutcome>) -> Self {
            Self {
                outcomes: std::sync::Mutex::new(outcomes.into_iter().collect()),
            }
        }
    }

    #[async_trait]
    impl SyncTarget for ScriptedTarget {
        async fn attempt_sync(&self, _record: &ParcelRecord) -> SyncOutcome {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(SyncOutcome::Failed)
        }
    }

    /// Target whose attempts never resolve on their own.
    struct StuckTarget;

    #[async_trait]
    impl SyncTarget for StuckTarget {
        async fn attempt_sync(&self, _record: &ParcelRecord) -> SyncOutcome {
            std::future::pending().await
        }
    }

    /// Target that fails exactly the ids marked after construction.
    struct PartialTarget {
        failing_ids: std::sync::Mutex<HashSet<String>>,
    }

    impl PartialTarget {
        fn new() -> Self {
            Self {
                failing_ids: std::sync::Mutex::new(HashSet::new()),
            }
        }

        fn fail_id(&self, record_id: &str) {
            self.failing_ids.lock().unwrap().insert(record_id.to_string());
        }
    }

    #[async_trait]
    impl SyncTarget for PartialTarget {
        async fn attempt_sync(&self, record: &ParcelRecord) -> SyncOutcome {
            if self.failing_ids.lock().unwrap().contains(&record.id) {
                SyncOutcome::Failed
            } else {
                SyncOutcome::Synced
            }
        }
    }

    fn test_repo() -> (tempfile::TempDir, RecordRepository) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new(StoragePaths::new(dir.path()));
        storage.initialize().expect("initialize");
        (dir, RecordRepository::new(storage))
    }

    fn test_engine(target: Option<Arc<dyn SyncTarget>>) -> (tempfile::TempDir, SyncEngine) {
        let (dir, repo) = test_repo();
        let engine = SyncEngine::new(repo, target, Duration::from_secs(5));
        (dir, engine)
    }

    fn create_request() -> CreateRecordRequest {
        CreateRecordRequest {
            avatar: None,
            address: "12 Harbor Lane".to_string(),
            certificate_number: "CT-2041".to_string(),
            owner: "M. Reyes".to_string(),
        }
    }

    async fn wait_for_status(engine: &SyncEngine, record_id: &str, expected: SyncStatus) {
        for _ in 0..200 {
            if engine.get(record_id).await.map(|r| r.sync_status) == Some(expected) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("record {record_id} never reached {expected:?}");
    }

    #[tokio::test]
    async fn create_starts_pending_and_persists() {
        let (_dir, engine) = test_engine(None);
        let record = engine.create(create_request()).await;

        assert_eq!(record.sync_status, SyncStatus::Pending);
        assert!(!record.id.is_empty());

        let listed = engine.list().await;
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn create_never_reuses_ids() {
        let (_dir, engine) = test_engine(None);
        let first = engine.create(create_request()).await;
        let second = engine.create(create_request()).await;
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn load_from_store_restores_collection() {
        let (dir, engine) = test_engine(None);
        let record = engine.create(create_request()).await;

        // A fresh engine over the same directory sees the record.
        let storage = LocalStorage::new(StoragePaths::new(dir.path()));
        let restored = SyncEngine::new(
            RecordRepository::new(storage),
            None,
            Duration::from_secs(5),
        );
        let count = restored.load_from_store().await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(restored.get(&record.id).await, Some(record));
    }

    #[tokio::test]
    async fn update_field_mutates_without_touching_status() {
        let (_dir, engine) = test_engine(None);
        let record = engine.create(create_request()).await;

        let updated = engine
            .update_field(&record.id, RecordField::Owner, "L. Okafor".to_string())
            .await;
        assert!(updated);

        let current = engine.get(&record.id).await.unwrap();
        assert_eq!(current.owner, "L. Okafor");
        assert_eq!(current.sync_status, SyncStatus::Pending);
    }

    #[tokio::test]
    async fn update_field_on_unknown_id_is_silent_noop() {
        let (_dir, engine) = test_engine(None);
        let updated = engine
            .update_field("missing", RecordField::Owner, "X".to_string())
            .await;
        assert!(!updated);
    }

    #[tokio::test]
    async fn second_request_while_in_flight_is_dropped() {
        let target = Arc::new(GatedTarget::new());
        let (_dir, engine) = test_engine(Some(target.clone()));
        let record = engine.create(create_request()).await;

        assert!(engine.request_sync(&record.id).await);
        assert!(!engine.request_sync(&record.id).await);

        // Give the spawned attempt time to reach the target: exactly one
        // invocation despite two requests.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(target.calls.load(Ordering::SeqCst), 1);

        target.release.notify_waiters();
        wait_for_status(&engine, &record.id, SyncStatus::Synced).await;
    }

    #[tokio::test]
    async fn failed_record_can_be_retried_explicitly() {
        let target = Arc::new(ScriptedTarget::new([
            SyncOutcome::Failed,
            SyncOutcome::Synced,
        ]));
        let (_dir, engine) = test_engine(Some(target));
        let record = engine.create(create_request()).await;

        assert!(engine.request_sync(&record.id).await);
        wait_for_status(&engine, &record.id, SyncStatus::Failed).await;

        // No automatic retry happened; a new explicit request re-enters
        // the state machine.
        assert!(engine.request_sync(&record.id).await);
        wait_for_status(&engine, &record.id, SyncStatus::Synced).await;
    }

    #[tokio::test]
    async fn synced_record_is_not_resynced() {
        let target = Arc::new(ScriptedTarget::new([SyncOutcome::Synced]));
        let (_dir, engine) = test_engine(Some(target));
        let record = engine.create(create_request()).await;

        assert!(engine.request_sync(&record.id).await);
        wait_for_status(&engine, &record.id, SyncStatus::Synced).await;

        assert!(!engine.request_sync(&record.id).await);
    }

    #[tokio::test]
    async fn unknown_id_and_disabled_target_are_dropped() {
        let target = Arc::new(ScriptedTarget::new([]));
        let (_dir, engine) = test_engine(Some(target));
        assert!(!engine.request_sync("missing").await);

        let (_dir2, disabled) = test_engine(None);
        let record = disabled.create(create_request()).await;
        assert!(!disabled.request_sync(&record.id).await);
        assert_eq!(
            disabled.get(&record.id).await.unwrap().sync_status,
            SyncStatus::Pending
        );
    }

    #[tokio::test]
    async fn stuck_attempt_resolves_failed_after_timeout() {
        let (_dir, repo) = test_repo();
        let engine = SyncEngine::new(
            repo,
            Some(Arc::new(StuckTarget)),
            Duration::from_millis(50),
        );
        let record = engine.create(create_request()).await;

        assert!(engine.request_sync(&record.id).await);
        wait_for_status(&engine, &record.id, SyncStatus::Failed).await;
    }

    #[tokio::test]
    async fn bulk_sync_completes_partially() {
        let target = Arc::new(PartialTarget::new());
        let (_dir, engine) = test_engine(Some(target.clone()));

        let first = engine.create(create_request()).await;
        let second = engine.create(create_request()).await;
        target.fail_id(&second.id);

        let scheduled = engine
            .request_sync_many(&[first.id.clone(), second.id.clone()])
            .await;
        assert_eq!(scheduled, 2);

        // Partial completion is a normal outcome, not an error state.
        wait_for_status(&engine, &first.id, SyncStatus::Synced).await;
        wait_for_status(&engine, &second.id, SyncStatus::Failed).await;
    }

    #[tokio::test]
    async fn sync_selection_schedules_and_clears() {
        let target = Arc::new(ScriptedTarget::new([
            SyncOutcome::Synced,
            SyncOutcome::Synced,
        ]));
        let (_dir, engine) = test_engine(Some(target));
        let first = engine.create(create_request()).await;
        let second = engine.create(create_request()).await;

        engine.press(&first.id, Duration::from_millis(600)).await;
        engine.toggle_selection(&second.id).await;
        assert_eq!(engine.selected_ids().await.len(), 2);

        let scheduled = engine.sync_selection().await;
        assert_eq!(scheduled, 2);
        assert!(engine.selected_ids().await.is_empty());
        assert!(!engine.is_multi_select().await);

        wait_for_status(&engine, &first.id, SyncStatus::Synced).await;
        wait_for_status(&engine, &second.id, SyncStatus::Synced).await;
    }

    #[tokio::test]
    async fn selection_property_holds_through_engine() {
        let (_dir, engine) = test_engine(None);

        // Enter multi-select with A, toggle B twice, selection == {A};
        // toggling A empties the set and exits multi-select mode.
        engine.press("a", Duration::from_millis(500)).await;
        engine.toggle_selection("b").await;
        engine.toggle_selection("b").await;
        assert_eq!(engine.selected_ids().await, vec!["a".to_string()]);

        engine.toggle_selection("a").await;
        assert!(engine.selected_ids().await.is_empty());
        assert!(!engine.is_multi_select().await);
    }
}
