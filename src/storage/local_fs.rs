// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filesystem-backed JSON storage for the record collection.
//!
//! Each entity is a separate JSON file; writes are whole-file replace
//! operations. There is exactly one logical writer (the synchronization
//! engine), so no locking protocol is layered on top.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::StoragePaths;

/// Error type for local storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Local JSON-file storage manager.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    paths: StoragePaths,
}

impl LocalStorage {
    /// Create a new LocalStorage instance.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Create the storage directory structure.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.records_dir())?;
        Ok(())
    }

    /// Check whether a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().exists()
    }

    /// Read and deserialize a JSON file.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize and write a JSON file, replacing any previous contents.
    pub fn write_json<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, value)?;
        Ok(())
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// List file stems with the given extension in a directory.
    ///
    /// Returns an empty list when the directory does not exist yet.
    pub fn list_files(
        &self,
        dir: impl AsRef<Path>,
        extension: &str,
    ) -> StorageResult<Vec<String>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut stems = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    stems.push(stem.to_string());
                }
            }
        }
        Ok(stems)
    }
}
