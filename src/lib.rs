// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Parcel Registry - Session-Gated Record Synchronization Service
//!
//! This crate hosts a session authority issuing opaque bearer tokens
//! against a static credential registry, and the synchronization engine
//! reconciling locally-authored parcel records with a remote registry.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session authority and credential registry
//! - `sync` - Record synchronization engine
//! - `storage` - Local JSON-file record store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod sync;
