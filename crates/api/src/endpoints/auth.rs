//! Authentication endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tanvan_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Registration response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
}

/// Create a new user account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<tanvan_core::CreateUserInput>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let user = state.user_service.register(req).await?;

    Ok(ApiResponse::ok(RegisterResponse {
        id: user.id,
        username: user.username,
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Sign in to an existing account.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (user, token) = state
        .user_service
        .login(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(LoginResponse {
        id: user.id,
        username: user.username,
        token,
    }))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Sign out (invalidate the current token by rotating it).
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LogoutResponse>> {
    state.user_service.logout(&user.id).await?;

    Ok(ApiResponse::ok(LogoutResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
