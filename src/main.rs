// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parcel_registry_server::api::router;
use parcel_registry_server::auth::{SessionAuthority, StaticCredentialRegistry};
use parcel_registry_server::config::{Config, SyncMode};
use parcel_registry_server::state::AppState;
use parcel_registry_server::storage::{LocalStorage, RecordRepository, StoragePaths};
use parcel_registry_server::sync::{
    RemoteSyncTarget, SimulatedSyncTarget, SyncEngine, SyncTarget,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env();

    // Initialize the local record store (idempotent)
    let storage = LocalStorage::new(StoragePaths::new(&config.data_dir));
    storage
        .initialize()
        .expect("Failed to initialize record store");

    let target: Option<Arc<dyn SyncTarget>> = match &config.sync_mode {
        SyncMode::Disabled => {
            info!("No sync capability configured; synchronization is disabled");
            None
        }
        SyncMode::Remote(url) => {
            info!(endpoint = %url, "Using remote sync target");
            Some(Arc::new(
                RemoteSyncTarget::new(url).expect("Invalid SYNC_TARGET_URL"),
            ))
        }
        SyncMode::Simulated => {
            info!("Using simulated sync target");
            Some(Arc::new(SimulatedSyncTarget::new()))
        }
    };
    let sync_enabled = target.is_some();

    let engine = SyncEngine::new(RecordRepository::new(storage), target, config.sync_timeout);
    let restored = engine
        .load_from_store()
        .await
        .expect("Failed to load record store");
    info!(records = restored, "Record store loaded");

    let authority = SessionAuthority::new(Arc::new(StaticCredentialRegistry::with_defaults()));
    let state = AppState::new(authority, engine, sync_enabled);
    let app = router(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    info!(%addr, "Parcel registry server listening (docs at /docs)");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_token.cancel();
        }
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
