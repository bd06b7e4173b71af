// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Item Synchronization Engine
//!
//! Client-side state machine reconciling locally-authored parcel records
//! with the remote registry. The engine owns the record collection; the
//! local store persists it, and the [`target::SyncTarget`] capability
//! resolves individual reconciliation attempts.
//!
//! Concurrency model: one execution context, asynchronous attempts. Per
//! record at most one attempt is outstanding; across records attempts
//! are independent and unordered. There is no cancellation API; an
//! in-flight attempt always resolves, bounded by the configured timeout.

pub mod engine;
pub mod selection;
pub mod target;

pub use engine::SyncEngine;
pub use selection::{SelectionSet, LONG_PRESS_THRESHOLD};
pub use target::{RemoteSyncTarget, SimulatedSyncTarget, SyncOutcome, SyncTarget};
