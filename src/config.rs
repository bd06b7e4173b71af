// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and the `Config` struct
//! loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the local record store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SYNC_TARGET_URL` | Remote endpoint records are reconciled against | Unset (sync disabled) |
//! | `SYNC_SIMULATE` | Set to `1` to use the simulated sync target | Unset |
//! | `SYNC_TIMEOUT_SECS` | Bound on a single sync attempt | `30` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

/// Environment variable name for the record store directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the remote sync target endpoint.
pub const SYNC_TARGET_URL_ENV: &str = "SYNC_TARGET_URL";

/// Environment variable name enabling the simulated sync target.
pub const SYNC_SIMULATE_ENV: &str = "SYNC_SIMULATE";

/// Environment variable name for the per-attempt sync timeout.
pub const SYNC_TIMEOUT_SECS_ENV: &str = "SYNC_TIMEOUT_SECS";

/// Default bound on a single sync attempt. A stuck attempt resolves as
/// failed once this elapses; records never stay pending forever.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// How the engine resolves sync attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMode {
    /// No sync capability configured; scheduling requests are refused.
    Disabled,
    /// Reconcile against a remote HTTP endpoint.
    Remote(String),
    /// Resolve attempts with the simulated outcome policy.
    Simulated,
}

/// Runtime configuration, loaded from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub sync_mode: SyncMode,
    pub sync_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string());

        // A configured remote target wins over the simulation flag.
        let sync_mode = match env::var(SYNC_TARGET_URL_ENV) {
            Ok(url) if !url.is_empty() => SyncMode::Remote(url),
            _ => match env::var(SYNC_SIMULATE_ENV).as_deref() {
                Ok("1") | Ok("true") => SyncMode::Simulated,
                _ => SyncMode::Disabled,
            },
        };

        let sync_timeout = env::var(SYNC_TIMEOUT_SECS_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SYNC_TIMEOUT);

        Self {
            host,
            port,
            data_dir,
            sync_mode,
            sync_timeout,
        }
    }

    /// Whether any sync capability is configured.
    pub fn sync_enabled(&self) -> bool {
        self.sync_mode != SyncMode::Disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_enabled_reflects_mode() {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 8080,
            data_dir: "/tmp".into(),
            sync_mode: SyncMode::Disabled,
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
        };
        assert!(!config.sync_enabled());

        let config = Config {
            sync_mode: SyncMode::Simulated,
            ..config
        };
        assert!(config.sync_enabled());
    }
}
