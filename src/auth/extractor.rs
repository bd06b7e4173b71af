// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for bearer tokens.
//!
//! Use the `BearerToken` extractor in handlers that operate on a session:
//!
//! ```rust,ignore
//! async fn my_handler(BearerToken(token): BearerToken) -> impl IntoResponse {
//!     // token is the opaque string from `Authorization: Bearer <token>`
//! }
//! ```
//!
//! A missing or malformed header rejects with 401 before the handler
//! runs; it is never surfaced as a different error kind.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::AuthError;

/// Extractor carrying the raw bearer token from the Authorization header.
///
/// The token is not validated here; handlers pass it to the session
/// authority, which owns lookup and expiry semantics.
#[derive(Debug)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?
            .trim();

        if token.is_empty() {
            return Err(AuthError::InvalidAuthHeader);
        }

        Ok(BearerToken(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<BearerToken, AuthError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_header_rejected() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingAuthHeader));
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let err = extract(Some("Basic dXNlcjpwYXNz")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuthHeader));
    }

    #[tokio::test]
    async fn empty_token_rejected() {
        let err = extract(Some("Bearer ")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuthHeader));
    }

    #[tokio::test]
    async fn bearer_token_extracted_verbatim() {
        let BearerToken(token) = extract(Some("Bearer abc123")).await.unwrap();
        assert_eq!(token, "abc123");
    }
}
