// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::BearerToken,
    error::{ApiError, RequestError},
    models::{
        BulkSyncAccepted, BulkSyncRequest, CreateRecordRequest, ParcelRecord, SyncAccepted,
        UpdateRecordRequest,
    },
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/records",
    tag = "Records",
    responses((status = 200, body = [ParcelRecord]))
)]
pub async fn list_records(State(state): State<AppState>) -> Json<Vec<ParcelRecord>> {
    Json(state.engine.list().await)
}

#[utoipa::path(
    get,
    path = "/v1/records/{record_id}",
    params(
        ("record_id" = String, Path, description = "Identifier of the record")
    ),
    tag = "Records",
    responses((status = 200, body = ParcelRecord), (status = 404))
)]
pub async fn get_record(
    Path(record_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ParcelRecord>, ApiError> {
    state
        .engine
        .get(&record_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Record not found"))
}

#[utoipa::path(
    post,
    path = "/v1/records",
    request_body = CreateRecordRequest,
    tag = "Records",
    responses((status = 201, body = ParcelRecord), (status = 400))
)]
pub async fn create_record(
    State(state): State<AppState>,
    Json(request): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<ParcelRecord>), ApiError> {
    if request.address.is_empty() || request.certificate_number.is_empty() || request.owner.is_empty()
    {
        return Err(ApiError::bad_request(
            "address, certificate_number, and owner are required",
        ));
    }

    let record = state.engine.create(request).await;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/v1/records/{record_id}",
    params(
        ("record_id" = String, Path, description = "Identifier of the record to update")
    ),
    request_body = UpdateRecordRequest,
    tag = "Records",
    responses((status = 200, body = ParcelRecord), (status = 404))
)]
pub async fn update_record(
    Path(record_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<Json<ParcelRecord>, ApiError> {
    let updated = state
        .engine
        .update_field(&record_id, request.field, request.value)
        .await;
    if !updated {
        return Err(ApiError::not_found("Record not found"));
    }

    state
        .engine
        .get(&record_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Record not found"))
}

/// Check that the caller holds a live session and that a sync capability
/// is configured. Synchronization is unavailable to guest callers.
async fn require_sync_access(state: &AppState, token: &str) -> Result<(), RequestError> {
    state.authority.write().await.verify(token)?;
    if !state.sync_enabled {
        return Err(ApiError::service_unavailable("Sync target is not configured").into());
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/v1/records/{record_id}/sync",
    params(
        ("record_id" = String, Path, description = "Identifier of the record to reconcile")
    ),
    tag = "Records",
    responses(
        (status = 202, body = SyncAccepted),
        (status = 401, description = "Missing, invalid, or expired token"),
        (status = 503, description = "No sync capability configured")
    )
)]
pub async fn sync_record(
    Path(record_id): Path<String>,
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<(StatusCode, Json<SyncAccepted>), RequestError> {
    require_sync_access(&state, &token).await?;

    let scheduled = state.engine.request_sync(&record_id).await;
    Ok((StatusCode::ACCEPTED, Json(SyncAccepted { scheduled })))
}

#[utoipa::path(
    post,
    path = "/v1/records/sync",
    request_body = BulkSyncRequest,
    tag = "Records",
    responses(
        (status = 202, body = BulkSyncAccepted),
        (status = 401, description = "Missing, invalid, or expired token"),
        (status = 503, description = "No sync capability configured")
    )
)]
pub async fn sync_bulk(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(request): Json<BulkSyncRequest>,
) -> Result<(StatusCode, Json<BulkSyncAccepted>), RequestError> {
    require_sync_access(&state, &token).await?;

    let requested = request.ids.len();
    let scheduled = state.engine.request_sync_many(&request.ids).await;
    Ok((
        StatusCode::ACCEPTED,
        Json(BulkSyncAccepted {
            requested,
            scheduled,
        }),
    ))
}
