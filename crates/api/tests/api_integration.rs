//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tanvan_api::{middleware::AppState, router as api_router};
use tanvan_core::{
    ArticleService, CommentService, EmailService, FollowService, PostService, ResetService,
    TimelineService, UserService,
};
use tanvan_db::entities::post;
use tanvan_db::repositories::{
    ArticleRepository, CategoryRepository, CommentRepository, DiscussionRepository,
    EditorProfileRepository, FollowRepository, MediaRepository, PostRepository, TagRepository,
    UserRepository,
};
use tower::ServiceExt;

/// Create a mock database connection with the given post query results.
fn mock_db_with_posts(posts: Vec<post::Model>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([posts])
        .into_connection()
}

/// Create test app state backed by mock databases.
fn create_test_state(post_db: DatabaseConnection) -> AppState {
    let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let post_db = Arc::new(post_db);

    let user_repo = UserRepository::new(empty());
    let editor_repo = EditorProfileRepository::new(empty());
    let post_repo = PostRepository::new(Arc::clone(&post_db));
    let article_repo = ArticleRepository::new(empty());
    let follow_repo = FollowRepository::new(empty());
    let category_repo = CategoryRepository::new(empty());
    let tag_repo = TagRepository::new(empty());
    let media_repo = MediaRepository::new(empty());
    let discussion_repo = DiscussionRepository::new(empty());
    let comment_repo = CommentRepository::new(empty());

    let user_service = UserService::new(user_repo.clone(), editor_repo);
    let post_service = PostService::new(post_repo.clone());
    let timeline_service = TimelineService::new(post_repo, article_repo.clone(), follow_repo.clone());
    let follow_service = FollowService::new(follow_repo);
    let article_service = ArticleService::new(article_repo, category_repo, tag_repo, media_repo);
    let comment_service = CommentService::new(comment_repo, discussion_repo);
    let reset_service = ResetService::new(
        user_repo,
        EmailService::disabled(),
        "test-secret".to_string(),
        600,
        "https://example.com".to_string(),
    );

    AppState {
        user_service,
        post_service,
        timeline_service,
        follow_service,
        article_service,
        comment_service,
        reset_service,
        posts_per_page: 25,
    }
}

fn test_app(state: AppState) -> Router {
    Router::new().nest("/api", api_router()).with_state(state)
}

#[tokio::test]
async fn test_explore_without_auth_returns_empty_page() {
    let state = create_test_state(mock_db_with_posts(vec![]));
    let app = test_app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/explore")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["data"]["items"], serde_json::json!([]));
    assert_eq!(json["data"]["hasNext"], serde_json::json!(false));
}

#[tokio::test]
async fn test_timeline_requires_authentication() {
    let state = create_test_state(mock_db_with_posts(vec![]));
    let app = test_app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/timeline")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_with_mismatched_passwords_is_rejected() {
    let state = create_test_state(mock_db_with_posts(vec![]));
    let app = test_app(state);

    let body = serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "password123",
        "password2": "password124",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert!(json["error"]["fields"]["password2"].is_array());
}

#[tokio::test]
async fn test_register_with_malformed_email_is_rejected() {
    let state = create_test_state(mock_db_with_posts(vec![]));
    let app = test_app(state);

    let body = serde_json::json!({
        "username": "alice",
        "email": "not-an-email",
        "password": "password123",
        "password2": "password123",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_page_found_and_missing() {
    let state = create_test_state(mock_db_with_posts(vec![]));

    let response = test_app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/pages/tan-van")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = test_app(state)
        .oneshot(
            Request::builder()
                .uri("/api/pages/khong-ton-tai")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_reset_token_is_single_collapsed_outcome() {
    let state = create_test_state(mock_db_with_posts(vec![]));
    let app = test_app(state);

    let body = serde_json::json!({
        "password": "newpassword123",
        "password2": "newpassword123",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reset-password/confirm/garbage-token")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["error"]["code"], "INVALID_OR_EXPIRED_TOKEN");
}
