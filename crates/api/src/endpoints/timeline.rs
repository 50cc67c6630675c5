//! Timeline endpoints: the followed-posts feed and the explore view.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tanvan_common::AppResult;
use tanvan_core::Page;
use tanvan_db::entities::post;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Page number query params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
}

const fn default_page() -> u64 {
    1
}

/// One post in a listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub body: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<post::Model> for PostResponse {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            body: p.body,
            user_id: p.user_id,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// A page of items with navigation flags.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PageResponse<T> {
    /// Map a service page into a response page.
    pub fn from_page<S>(page: Page<S>, f: impl Fn(S) -> T) -> Self {
        Self {
            items: page.items.into_iter().map(f).collect(),
            page: page.page,
            has_next: page.has_next,
            has_prev: page.has_prev,
        }
    }
}

/// The authenticated user's feed: own posts plus posts from followed users.
async fn timeline(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<PostResponse>>> {
    let page = state
        .timeline_service
        .followed_posts(&user.id, query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(
        page,
        PostResponse::from,
    )))
}

/// All posts, newest first.
async fn explore(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<PostResponse>>> {
    let page = state
        .timeline_service
        .explore(query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(
        page,
        PostResponse::from,
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timeline", get(timeline))
        .route("/explore", get(explore))
}
