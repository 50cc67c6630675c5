//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tanvan_core::{
    ArticleService, CommentService, FollowService, PostService, ResetService, TimelineService,
    UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub timeline_service: TimelineService,
    pub follow_service: FollowService,
    pub article_service: ArticleService,
    pub comment_service: CommentService,
    pub reset_service: ResetService,
    /// Feed page size.
    pub posts_per_page: u64,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` into the request extensions and
/// records activity on the account.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        if let Err(e) = state.user_service.touch_last_seen(&user.id).await {
            tracing::warn!(error = %e, "Failed to record last_seen");
        }
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
