//! API endpoints.

mod articles;
mod auth;
mod discussions;
mod following;
mod pages;
mod posts;
mod reset;
mod timeline;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(timeline::router())
        .nest("/users", users::router())
        .nest("/posts", posts::router())
        .nest("/articles", articles::router())
        .nest("/discussions", discussions::router())
        .nest("/reset-password", reset::router())
        .nest("/pages", pages::router())
        .merge(following::router())
}
