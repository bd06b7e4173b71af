// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential registry backing the session authority.
//!
//! The registry is a static, process-wide set of username/secret pairs
//! with no create/update/delete surface. The authority only depends on
//! the [`CredentialVerifier`] trait, so the plaintext-equality registry
//! can be replaced by a salted-hash comparison without touching the
//! session table contract.

use std::collections::HashMap;

/// Credential verification capability.
pub trait CredentialVerifier: Send + Sync {
    /// Check a username/secret pair against the registry.
    fn verify_credential(&self, username: &str, secret: &str) -> bool;
}

/// Static in-memory credential registry with exact-equality matching.
///
/// Secrets are compared verbatim; no hashing is applied.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialRegistry {
    credentials: HashMap<String, String>,
}

impl StaticCredentialRegistry {
    /// Build a registry from explicit username/secret pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            credentials: pairs
                .into_iter()
                .map(|(u, s)| (u.into(), s.into()))
                .collect(),
        }
    }

    /// Registry preloaded with the built-in deployment accounts.
    pub fn with_defaults() -> Self {
        Self::from_pairs([
            ("admin", "password123"),
            ("user1", "mypassword"),
            ("demo", "demo123"),
        ])
    }
}

impl CredentialVerifier for StaticCredentialRegistry {
    fn verify_credential(&self, username: &str, secret: &str) -> bool {
        self.credentials
            .get(username)
            .is_some_and(|expected| expected == secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accounts_verify() {
        let registry = StaticCredentialRegistry::with_defaults();
        assert!(registry.verify_credential("admin", "password123"));
        assert!(registry.verify_credential("user1", "mypassword"));
        assert!(registry.verify_credential("demo", "demo123"));
    }

    #[test]
    fn wrong_secret_or_unknown_user_rejected() {
        let registry = StaticCredentialRegistry::with_defaults();
        assert!(!registry.verify_credential("admin", "password124"));
        assert!(!registry.verify_credential("admin", "PASSWORD123"));
        assert!(!registry.verify_credential("nobody", "password123"));
        assert!(!registry.verify_credential("admin", ""));
    }

    #[test]
    fn from_pairs_builds_custom_registry() {
        let registry = StaticCredentialRegistry::from_pairs([("ops", "s3cret")]);
        assert!(registry.verify_credential("ops", "s3cret"));
        assert!(!registry.verify_credential("admin", "password123"));
    }
}
