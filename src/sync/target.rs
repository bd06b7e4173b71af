// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sync outcome policy: how one reconciliation attempt is resolved.
//!
//! The engine only needs the [`SyncTarget`] capability; transport,
//! network-layer retries, and authentication of the remote call live
//! behind it. Production wires [`RemoteSyncTarget`]; development and
//! tests use [`SimulatedSyncTarget`] or a deterministic stand-in.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use url::Url;

use crate::models::ParcelRecord;

/// Terminal result of one reconciliation attempt.
///
/// This is a data value, not an error channel: a failed attempt is a
/// normal outcome the caller decides whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced,
    Failed,
}

/// Capability invoked once per scheduled sync attempt.
#[async_trait]
pub trait SyncTarget: Send + Sync {
    async fn attempt_sync(&self, record: &ParcelRecord) -> SyncOutcome;
}

/// Network-backed sync target.
///
/// POSTs the record as JSON to the configured endpoint; any 2xx response
/// counts as reconciled.
pub struct RemoteSyncTarget {
    client: reqwest::Client,
    endpoint: Url,
}

impl RemoteSyncTarget {
    pub fn new(endpoint: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl SyncTarget for RemoteSyncTarget {
    async fn attempt_sync(&self, record: &ParcelRecord) -> SyncOutcome {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(record)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => SyncOutcome::Synced,
            Ok(response) => {
                tracing::warn!(
                    record_id = %record.id,
                    status = %response.status(),
                    "Sync target rejected record"
                );
                SyncOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(record_id = %record.id, error = %e, "Sync target unreachable");
                SyncOutcome::Failed
            }
        }
    }
}

/// Default simulated attempt latency.
const SIMULATED_DELAY: Duration = Duration::from_secs(2);

/// Default simulated success probability.
const SIMULATED_SUCCESS_RATE: f64 = 0.8;

/// Simulated sync target: fixed delay, probabilistic outcome.
///
/// Used when no remote endpoint is configured and `SYNC_SIMULATE` is set.
pub struct SimulatedSyncTarget {
    delay: Duration,
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedSyncTarget {
    pub fn new() -> Self {
        Self {
            delay: SIMULATED_DELAY,
            success_rate: SIMULATED_SUCCESS_RATE,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            delay: SIMULATED_DELAY,
            success_rate: SIMULATED_SUCCESS_RATE,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = success_rate;
        self
    }
}

impl Default for SimulatedSyncTarget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncTarget for SimulatedSyncTarget {
    async fn attempt_sync(&self, _record: &ParcelRecord) -> SyncOutcome {
        tokio::time::sleep(self.delay).await;

        let roll: f64 = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen()
        };

        if roll < self.success_rate {
            SyncOutcome::Synced
        } else {
            SyncOutcome::Failed
        }
    }
}
