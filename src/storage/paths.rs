// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the local record store layout.

use std::path::{Path, PathBuf};

/// Default base directory for persistent storage.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities for the local filesystem store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing all parcel records.
    pub fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    /// Path to a specific record file.
    pub fn record(&self, record_id: &str) -> PathBuf {
        self.records_dir().join(format!("{record_id}.json"))
    }
}
