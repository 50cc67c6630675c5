//! User profile endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tanvan_common::AppResult;
use tanvan_core::{avatar_url, PostVariant, UpdateProfileInput};
use tanvan_db::entities::user;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

use super::timeline::{PageQuery, PageResponse, PostResponse};

/// Profile view of a user.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub about_me: Option<String>,
    pub avatar_url: String,
    pub role: user::Role,
    pub last_seen: Option<String>,
    pub followers_count: u64,
    pub following_count: u64,
    pub posts_count: u64,
    /// Whether the requesting user follows this profile. Absent when the
    /// request is unauthenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// Get a user's profile by username.
async fn profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = state.user_service.get_by_username(&username).await?;

    let followers_count = state.follow_service.count_followers(&user.id).await?;
    let following_count = state.follow_service.count_following(&user.id).await?;
    let posts_count = state.post_service.count_by_user(&user.id).await?;

    let is_following = match viewer {
        Some(ref viewer) if viewer.id != user.id => Some(
            state
                .follow_service
                .is_following(&viewer.id, &user.id)
                .await?,
        ),
        _ => None,
    };

    Ok(ApiResponse::ok(ProfileResponse {
        avatar_url: avatar_url(&user.email, 128),
        id: user.id,
        username: user.username,
        about_me: user.about_me,
        role: user.role,
        last_seen: user.last_seen.map(|t| t.to_rfc3339()),
        followers_count,
        following_count,
        posts_count,
        is_following,
    }))
}

/// Update the authenticated user's profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let updated = state.user_service.update_profile(&user.id, req).await?;

    let followers_count = state.follow_service.count_followers(&updated.id).await?;
    let following_count = state.follow_service.count_following(&updated.id).await?;
    let posts_count = state.post_service.count_by_user(&updated.id).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        avatar_url: avatar_url(&updated.email, 128),
        id: updated.id,
        username: updated.username,
        about_me: updated.about_me,
        role: updated.role,
        last_seen: updated.last_seen.map(|t| t.to_rfc3339()),
        followers_count,
        following_count,
        posts_count,
        is_following: None,
    }))
}

/// Get one author's posts (paginated, newest first).
async fn user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<PostResponse>>> {
    let user = state.user_service.get_by_username(&username).await?;
    let page = state
        .timeline_service
        .user_posts(&user.id, query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(
        page,
        PostResponse::from,
    )))
}

/// One entry of an author's merged activity.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItemResponse {
    pub kind: &'static str,
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: String,
}

impl From<PostVariant> for ActivityItemResponse {
    fn from(variant: PostVariant) -> Self {
        let kind = match variant {
            PostVariant::Post(_) => "post",
            PostVariant::Article(_) => "article",
        };
        Self {
            kind,
            id: variant.id().to_string(),
            author_id: variant.author_id().to_string(),
            body: variant.body().to_string(),
            created_at: variant.created_at().to_rfc3339(),
        }
    }
}

/// Activity listing params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    #[serde(default = "default_activity_limit")]
    pub limit: u64,
}

const fn default_activity_limit() -> u64 {
    20
}

/// One edge of the follow graph.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdgeResponse {
    pub follower_id: String,
    pub followed_id: String,
    pub created_at: String,
}

impl From<tanvan_db::entities::follow::Model> for FollowEdgeResponse {
    fn from(f: tanvan_db::entities::follow::Model) -> Self {
        Self {
            follower_id: f.follower_id,
            followed_id: f.followed_id,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// Get users following this user.
async fn followers(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<FollowEdgeResponse>>> {
    let user = state.user_service.get_by_username(&username).await?;
    let limit = state.posts_per_page;
    let offset = query.page.saturating_sub(1) * limit;

    let edges = state.follow_service.followers(&user.id, limit, offset).await?;

    Ok(ApiResponse::ok(edges.into_iter().map(Into::into).collect()))
}

/// Get users this user is following.
async fn following(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<FollowEdgeResponse>>> {
    let user = state.user_service.get_by_username(&username).await?;
    let limit = state.posts_per_page;
    let offset = query.page.saturating_sub(1) * limit;

    let edges = state.follow_service.following(&user.id, limit, offset).await?;

    Ok(ApiResponse::ok(edges.into_iter().map(Into::into).collect()))
}

/// Get one author's posts and articles merged, newest first.
async fn user_activity(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<ApiResponse<Vec<ActivityItemResponse>>> {
    let user = state.user_service.get_by_username(&username).await?;
    let limit = query.limit.min(100);

    let activity = state
        .timeline_service
        .author_activity(&user.id, limit)
        .await?;

    Ok(ApiResponse::ok(
        activity.into_iter().map(Into::into).collect(),
    ))
}

/// Get one author's articles (paginated, newest first).
async fn user_articles(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<super::articles::ArticleSummaryResponse>>> {
    let user = state.user_service.get_by_username(&username).await?;
    let page = state
        .article_service
        .list_by_author(&user.id, query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(page, Into::into)))
}

/// Get one author's comments (paginated, newest first).
async fn user_comments(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<super::discussions::CommentResponse>>> {
    let user = state.user_service.get_by_username(&username).await?;
    let page = state
        .comment_service
        .list_by_user(&user.id, query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(page, Into::into)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{username}", get(profile))
        .route("/{username}/posts", get(user_posts))
        .route("/{username}/articles", get(user_articles))
        .route("/{username}/comments", get(user_comments))
        .route("/{username}/activity", get(user_activity))
        .route("/{username}/followers", get(followers))
        .route("/{username}/following", get(following))
        .route("/update", post(update_profile))
}
