// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Authority
//!
//! Issues, verifies, and expires opaque bearer tokens against a static
//! credential registry.
//!
//! ## Auth Flow
//!
//! 1. Caller POSTs username/password to `/v1/auth/login`
//! 2. The credential registry checks the pair by exact equality
//! 3. On success a 32-byte random token is issued, keying a session
//!    that expires 24 hours after creation
//! 4. Subsequent requests carry `Authorization: Bearer <token>`
//!
//! ## Security
//!
//! - Tokens are opaque random identifiers, not self-describing signed
//!   tokens; the table lookup is the only source of truth
//! - Expired sessions are evicted lazily on access and are
//!   indistinguishable from absent ones to callers
//! - The table lives in one process; sessions are lost on restart

pub mod error;
pub mod extractor;
pub mod registry;
pub mod session;

pub use error::AuthError;
pub use extractor::BearerToken;
pub use registry::{CredentialVerifier, StaticCredentialRegistry};
pub use session::{Session, SessionAuthority};
