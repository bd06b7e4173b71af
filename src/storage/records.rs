// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record repository for the local store.
//!
//! The collection is read once at startup and written through on every
//! mutation. Each record is stored as a separate JSON file under
//! `records/`; writes replace the whole file.

use crate::models::ParcelRecord;

use super::{LocalStorage, StorageError, StorageResult};

/// Repository for parcel record persistence.
#[derive(Debug, Clone)]
pub struct RecordRepository {
    storage: LocalStorage,
}

impl RecordRepository {
    /// Create a new RecordRepository.
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Check if a record exists on disk.
    pub fn exists(&self, record_id: &str) -> bool {
        self.storage.exists(self.storage.paths().record(record_id))
    }

    /// Get a record by ID.
    pub fn get(&self, record_id: &str) -> StorageResult<ParcelRecord> {
        let path = self.storage.paths().record(record_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Record {record_id}")));
        }
        self.storage.read_json(path)
    }

    /// Persist one record, replacing any previous version.
    pub fn save(&self, record: &ParcelRecord) -> StorageResult<()> {
        self.storage
            .write_json(self.storage.paths().record(&record.id), record)
    }

    /// Persist the whole collection.
    pub fn save_all(&self, records: &[ParcelRecord]) -> StorageResult<()> {
        for record in records {
            self.save(record)?;
        }
        Ok(())
    }

    /// Load the whole collection from disk.
    ///
    /// Unreadable entries are skipped with a warning rather than failing
    /// startup.
    pub fn load_all(&self) -> StorageResult<Vec<ParcelRecord>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().records_dir(), "json")?;

        let mut records = Vec::new();
        for id in ids {
            match self.get(&id) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(record_id = %id, error = %e, "Skipping unreadable record");
                }
            }
        }
        Ok(records)
    }
}
