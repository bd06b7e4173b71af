// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    auth::{AuthError, BearerToken},
    error::{ApiError, RequestError},
    models::{
        LoginRequest, LoginResponse, LogoutResponse, SessionProfile, VerifyFailure,
        VerifyResponse,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, RequestError> {
    // Field presence is a caller-layer concern, checked before the
    // registry is consulted.
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required").into());
    }

    let mut authority = state.authority.write().await;
    let (token, session) = authority.login(&request.username, &request.password)?;

    Ok(Json(LoginResponse {
        token,
        username: session.username,
        expires_at: session.expires_at,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, body = LogoutResponse),
        (status = 401, description = "Missing, invalid, or expired token")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<LogoutResponse>, AuthError> {
    state.authority.write().await.logout(&token)?;
    Ok(Json(LogoutResponse {}))
}

#[utoipa::path(
    get,
    path = "/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, body = VerifyResponse),
        (status = 401, body = VerifyFailure)
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    token: Result<BearerToken, AuthError>,
) -> Response {
    let result = match token {
        Ok(BearerToken(token)) => state.authority.write().await.verify(&token),
        Err(e) => Err(e),
    };

    match result {
        Ok(session) => (
            StatusCode::OK,
            Json(VerifyResponse {
                valid: true,
                username: session.username,
                expires_at: session.expires_at,
            }),
        )
            .into_response(),
        Err(e) => (
            e.status_code(),
            Json(VerifyFailure {
                valid: false,
                error: e.to_string(),
                error_code: e.error_code().to_string(),
            }),
        )
            .into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, body = SessionProfile),
        (status = 401, description = "Missing, invalid, or expired token")
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<SessionProfile>, AuthError> {
    let session = state.authority.write().await.current_user(&token)?;
    Ok(Json(SessionProfile {
        username: session.username,
        created_at: session.created_at,
        expires_at: session.expires_at,
    }))
}
