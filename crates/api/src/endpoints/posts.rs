//! Post endpoints.

use axum::{extract::State, routing::post, Json, Router};
use tanvan_common::AppResult;
use tanvan_core::CreatePostInput;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

use super::timeline::PostResponse;

/// Create a new post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let created = state.post_service.create(&user.id, req).await?;

    Ok(ApiResponse::ok(created.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create", post(create))
}
