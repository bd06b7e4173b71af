// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::SessionAuthority;
use crate::sync::SyncEngine;

/// Shared application state.
///
/// The session authority sits behind a single `RwLock` and every
/// operation takes the write half (even lookups may evict), so authority
/// calls are strictly serialized with respect to each other.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<RwLock<SessionAuthority>>,
    pub engine: SyncEngine,
    /// Whether a sync capability is configured. Controlled by
    /// configuration, not by the data model.
    pub sync_enabled: bool,
}

impl AppState {
    pub fn new(authority: SessionAuthority, engine: SyncEngine, sync_enabled: bool) -> Self {
        Self {
            authority: Arc::new(RwLock::new(authority)),
            engine,
            sync_enabled,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use super::AppState;
    use crate::auth::{SessionAuthority, StaticCredentialRegistry};
    use crate::storage::{LocalStorage, RecordRepository, StoragePaths};
    use crate::sync::{SyncEngine, SyncTarget};

    /// Build a state over a throwaway store. The TempDir must outlive
    /// the state.
    pub(crate) fn test_state(
        target: Option<Arc<dyn SyncTarget>>,
        sync_enabled: bool,
    ) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new(StoragePaths::new(dir.path()));
        storage.initialize().expect("initialize");

        let authority =
            SessionAuthority::new(Arc::new(StaticCredentialRegistry::with_defaults()));
        let engine = SyncEngine::new(RecordRepository::new(storage), target, Duration::from_secs(5));

        (dir, AppState::new(authority, engine, sync_enabled))
    }
}
