// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        BulkSyncAccepted, BulkSyncRequest, CreateRecordRequest, LoginRequest, LoginResponse,
        LogoutResponse, ParcelRecord, RecordField, SessionProfile, SyncAccepted, SyncStatus,
        UpdateRecordRequest, VerifyFailure, VerifyResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod records;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/verify", get(auth::verify))
        .route("/auth/me", get(auth::current_user))
        .route(
            "/records",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/records/{record_id}",
            get(records::get_record).put(records::update_record),
        )
        .route("/records/{record_id}/sync", post(records::sync_record))
        .route("/records/sync", post(records::sync_bulk))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::verify,
        auth::current_user,
        records::list_records,
        records::get_record,
        records::create_record,
        records::update_record,
        records::sync_record,
        records::sync_bulk,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            VerifyResponse,
            VerifyFailure,
            SessionProfile,
            ParcelRecord,
            SyncStatus,
            RecordField,
            CreateRecordRequest,
            UpdateRecordRequest,
            BulkSyncRequest,
            BulkSyncAccepted,
            SyncAccepted
        )
    ),
    tags(
        (name = "Auth", description = "Session issuance and verification"),
        (name = "Records", description = "Parcel record authoring and synchronization"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
