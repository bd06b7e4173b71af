// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Record Store
//!
//! Durable persistence of the parcel record collection, keyed by record
//! id. The store is read once at startup and written through on every
//! mutation; it never mutates the collection itself.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   records/
//!     {record_id}.json
//! ```
//!
//! ## Discipline
//!
//! The synchronization engine is the only writer. Writes are whole-record
//! replace operations, never partial patches, so readers never observe a
//! half-applied update.

pub mod local_fs;
pub mod paths;
pub mod records;

pub use local_fs::{LocalStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use records::RecordRepository;
