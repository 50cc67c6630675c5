//! Discussion and comment endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tanvan_common::AppResult;
use tanvan_core::CreateCommentInput;
use tanvan_db::entities::{comment, discussion};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

use super::timeline::{PageQuery, PageResponse};

/// Discussion creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionRequest {
    pub name: String,
}

/// One discussion.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl From<discussion::Model> for DiscussionResponse {
    fn from(d: discussion::Model) -> Self {
        Self {
            id: d.id,
            name: d.name,
            created_at: d.created_at.to_rfc3339(),
        }
    }
}

/// One comment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub body: String,
    pub like_count: i32,
    pub dislike_count: i32,
    pub user_id: String,
    pub discussion_id: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            body: c.body,
            like_count: c.like_count,
            dislike_count: c.dislike_count,
            user_id: c.user_id,
            discussion_id: c.discussion_id,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Create a discussion.
async fn create_discussion(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateDiscussionRequest>,
) -> AppResult<ApiResponse<DiscussionResponse>> {
    let discussion = state.comment_service.create_discussion(&req.name).await?;

    Ok(ApiResponse::ok(discussion.into()))
}

/// List discussions.
async fn list_discussions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<DiscussionResponse>>> {
    let page = state
        .comment_service
        .list_discussions(query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(
        page,
        DiscussionResponse::from,
    )))
}

/// Add a comment to a discussion.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let created = state.comment_service.create(&user.id, req).await?;

    Ok(ApiResponse::ok(created.into()))
}

/// List comments in a discussion.
async fn list_comments(
    State(state): State<AppState>,
    Path(discussion_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<CommentResponse>>> {
    let page = state
        .comment_service
        .list_for_discussion(&discussion_id, query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(
        page,
        CommentResponse::from,
    )))
}

/// Like result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub ok: bool,
}

/// Like a comment.
async fn like_comment(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<ReactionResponse>> {
    state.comment_service.like(&comment_id).await?;
    Ok(ApiResponse::ok(ReactionResponse { ok: true }))
}

/// Dislike a comment.
async fn dislike_comment(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<ReactionResponse>> {
    state.comment_service.dislike(&comment_id).await?;
    Ok(ApiResponse::ok(ReactionResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_discussions))
        .route("/create", post(create_discussion))
        .route("/comments", post(create_comment))
        .route("/{discussion_id}/comments", get(list_comments))
        .route("/comments/{comment_id}/like", post(like_comment))
        .route("/comments/{comment_id}/dislike", post(dislike_comment))
}
