// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API, plus the core domain types shared between the session
//! authority and the record synchronization engine. All wire types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON handling
//! and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Records**: Locally-authored parcel records and their sync status
//! - **Auth**: Login and session payloads for the session authority
//! - **Sync**: Scheduling requests and acknowledgements

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Record Models
// =============================================================================

/// Remote reconciliation status of a locally-authored record.
///
/// Every record is created `Pending`. A sync attempt resolves it to
/// `Synced` or `Failed`; a `Failed` record only becomes eligible again
/// through an explicit new sync request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
    Failed,
}

/// A parcel record authored on this instance.
///
/// Records are owned by the synchronization engine; the local store only
/// persists and restores them. The `id` is assigned once at creation and
/// never reused, even after deletion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ParcelRecord {
    /// Unique identifier for this record (UUID).
    pub id: String,
    /// Opaque reference to the parcel's avatar blob.
    pub avatar: String,
    /// Street address of the parcel.
    pub address: String,
    /// Title certificate number.
    pub certificate_number: String,
    /// Registered owner name.
    pub owner: String,
    /// Current reconciliation status against the remote registry.
    pub sync_status: SyncStatus,
}

/// Request to author a new parcel record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRecordRequest {
    /// Opaque avatar blob reference (optional).
    #[serde(default)]
    pub avatar: Option<String>,
    /// Street address of the parcel.
    pub address: String,
    /// Title certificate number.
    pub certificate_number: String,
    /// Registered owner name.
    pub owner: String,
}

/// A single mutable field of a parcel record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Avatar,
    Address,
    CertificateNumber,
    Owner,
}

/// Request to update one field of an existing record in place.
///
/// Field updates never touch `sync_status`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRecordRequest {
    /// Which field to mutate.
    pub field: RecordField,
    /// New value for the field.
    pub value: String,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Login request against the credential registry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    /// Username the session was issued for.
    pub username: String,
    /// When the session expires (24 h after creation).
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Token verification response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    /// Always `true` on the success path.
    pub valid: bool,
    pub username: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Token verification failure body.
///
/// Carries `valid: false` so clients can branch on one field without
/// inspecting the status code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyFailure {
    /// Always `false` on the failure path.
    pub valid: bool,
    pub error: String,
    pub error_code: String,
}

/// Profile of the session behind a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionProfile {
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Empty logout acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {}

// =============================================================================
// Sync Models
// =============================================================================

/// Request to schedule sync attempts for a set of record ids.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkSyncRequest {
    /// Ids to reconcile; each id gets one independent attempt.
    pub ids: Vec<String>,
}

/// Acknowledgement for a single sync scheduling call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncAccepted {
    /// Whether an attempt was actually scheduled. `false` means the call
    /// was dropped (unknown id, already synced, or attempt in flight).
    pub scheduled: bool,
}

/// Acknowledgement for a bulk sync scheduling call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkSyncAccepted {
    /// How many ids were requested.
    pub requested: usize,
    /// How many attempts were scheduled; the rest were dropped.
    pub scheduled: usize,
}
