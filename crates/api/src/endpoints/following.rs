//! Follow/unfollow endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tanvan_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Follow/unfollow request, by username.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub username: String,
}

/// Follow state response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub username: String,
    pub following: bool,
}

/// Follow a user by username.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowResponse>> {
    let target = state.user_service.get_by_username(&req.username).await?;
    state.follow_service.follow(&user.id, &target.id).await?;

    Ok(ApiResponse::ok(FollowResponse {
        username: target.username,
        following: true,
    }))
}

/// Unfollow a user by username.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowResponse>> {
    let target = state.user_service.get_by_username(&req.username).await?;
    state.follow_service.unfollow(&user.id, &target.id).await?;

    Ok(ApiResponse::ok(FollowResponse {
        username: target.username,
        following: false,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follow", post(follow))
        .route("/unfollow", post(unfollow))
}
