// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session authority: issues, verifies, and expires opaque bearer tokens.
//!
//! The session table is owned exclusively by [`SessionAuthority`];
//! callers hold it behind a single lock and every operation commits its
//! mutation before yielding, so concurrent calls are strictly serialized.
//!
//! Expired sessions are evicted lazily on the next lookup; there is no
//! background sweep. This bounds expiry checking to O(1) per access and
//! avoids a scheduler dependency.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};

use super::registry::CredentialVerifier;
use super::AuthError;

/// Session lifetime from creation.
const SESSION_TTL_HOURS: i64 = 24;

/// Token length in raw bytes before hex encoding (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// An active session, keyed in the table by its opaque token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues, verifies, and revokes session tokens against the credential
/// registry. Single-instance by design: the table is not shared across
/// processes, and sessions do not survive a restart.
pub struct SessionAuthority {
    registry: Arc<dyn CredentialVerifier>,
    sessions: HashMap<String, Session>,
    rng: SystemRandom,
}

impl SessionAuthority {
    /// Create an authority with an empty session table.
    pub fn new(registry: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            registry,
            sessions: HashMap::new(),
            rng: SystemRandom::new(),
        }
    }

    /// Authenticate a username/secret pair and issue a new session.
    ///
    /// Returns the opaque token together with the created session.
    pub fn login(&mut self, username: &str, secret: &str) -> Result<(String, Session), AuthError> {
        if !self.registry.verify_credential(username, secret) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.generate_token()?;
        let created_at = Utc::now();
        let session = Session {
            username: username.to_string(),
            created_at,
            expires_at: created_at + Duration::hours(SESSION_TTL_HOURS),
        };
        self.sessions.insert(token.clone(), session.clone());

        tracing::info!(username = %session.username, "Session issued");
        Ok((token, session))
    }

    /// Verify a token and return the session behind it.
    pub fn verify(&mut self, token: &str) -> Result<Session, AuthError> {
        self.lookup_active(token)
    }

    /// Return the full session profile behind a token.
    ///
    /// Identical lookup and expiry semantics as [`verify`](Self::verify).
    pub fn current_user(&mut self, token: &str) -> Result<Session, AuthError> {
        self.lookup_active(token)
    }

    /// Destroy the session behind a token.
    ///
    /// Fails with `Unauthenticated` for unknown tokens; a second call for
    /// the same token therefore fails. Expired tokens are evicted and
    /// reported exactly like unknown ones.
    pub fn logout(&mut self, token: &str) -> Result<(), AuthError> {
        self.lookup_active(token)?;
        self.sessions.remove(token);
        Ok(())
    }

    /// Number of live entries, including not-yet-evicted expired ones.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Look up a token, evicting it first when expired.
    ///
    /// Expiry is indistinguishable from absence for the caller.
    fn lookup_active(&mut self, token: &str) -> Result<Session, AuthError> {
        let now = Utc::now();
        match self.sessions.get(token) {
            None => Err(AuthError::Unauthenticated),
            Some(session) if session.is_expired_at(now) => {
                self.sessions.remove(token);
                Err(AuthError::Unauthenticated)
            }
            Some(session) => Ok(session.clone()),
        }
    }

    fn generate_token(&self) -> Result<String, AuthError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AuthError::Internal("system RNG unavailable".to_string()))?;

        let mut token = String::with_capacity(TOKEN_BYTES * 2);
        for byte in bytes {
            let _ = write!(token, "{byte:02x}");
        }
        Ok(token)
    }
}
