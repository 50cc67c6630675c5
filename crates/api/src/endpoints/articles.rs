//! Article endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tanvan_common::AppResult;
use tanvan_core::{ArticleView, CreateArticleInput, RegisterMediaInput};
use tanvan_db::entities::article;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

use super::timeline::{PageQuery, PageResponse};

/// One article in a listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummaryResponse {
    pub id: String,
    pub name: String,
    pub synopsis: Option<String>,
    pub user_id: String,
    pub category_id: String,
    pub created_at: String,
}

impl From<article::Model> for ArticleSummaryResponse {
    fn from(a: article::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            synopsis: a.synopsis,
            user_id: a.user_id,
            category_id: a.category_id,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// A full article with category, tags and media.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: String,
    pub name: String,
    pub body: String,
    pub synopsis: Option<String>,
    pub user_id: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub media: Vec<MediaResponse>,
    pub created_at: String,
}

/// One media item linked to an article.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: String,
    pub author: Option<String>,
    pub source: Option<String>,
    pub source_type: Option<String>,
    pub link: Option<String>,
}

impl From<ArticleView> for ArticleResponse {
    fn from(view: ArticleView) -> Self {
        Self {
            id: view.article.id,
            name: view.article.name,
            body: view.article.body,
            synopsis: view.article.synopsis,
            user_id: view.article.user_id,
            category: view.category.map(|c| c.name),
            tags: view.tags.into_iter().map(|t| t.name).collect(),
            media: view
                .media
                .into_iter()
                .map(|m| MediaResponse {
                    id: m.id,
                    author: m.author,
                    source: m.source,
                    source_type: m.source_type,
                    link: m.link,
                })
                .collect(),
            created_at: view.article.created_at.to_rfc3339(),
        }
    }
}

/// Publish a new article (editors only).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateArticleInput>,
) -> AppResult<ApiResponse<ArticleResponse>> {
    let view = state.article_service.create(&user, req).await?;

    Ok(ApiResponse::ok(view.into()))
}

/// List recent articles.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<ArticleSummaryResponse>>> {
    let page = state
        .article_service
        .list_recent(query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(
        page,
        ArticleSummaryResponse::from,
    )))
}

/// Get a full article by name.
async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<ApiResponse<ArticleResponse>> {
    let view = state.article_service.get_by_name(&name).await?;

    Ok(ApiResponse::ok(view.into()))
}

/// List articles in a category.
async fn by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PageResponse<ArticleSummaryResponse>>> {
    let page = state
        .article_service
        .list_by_category(&category_id, query.page, state.posts_per_page)
        .await?;

    Ok(ApiResponse::ok(PageResponse::from_page(
        page,
        ArticleSummaryResponse::from,
    )))
}

/// Category creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// One category.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

/// Create a category (editors only).
async fn create_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    if user.role != tanvan_db::entities::user::Role::Editor {
        return Err(tanvan_common::AppError::Forbidden(
            "only editors can manage categories".to_string(),
        ));
    }

    let category = state.article_service.create_category(&req.name).await?;

    Ok(ApiResponse::ok(CategoryResponse {
        id: category.id,
        name: category.name,
    }))
}

/// Register a media item (editors only).
async fn register_media(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RegisterMediaInput>,
) -> AppResult<ApiResponse<MediaResponse>> {
    let media = state.article_service.register_media(&user, req).await?;

    Ok(ApiResponse::ok(MediaResponse {
        id: media.id,
        author: media.author,
        source: media.source,
        source_type: media.source_type,
        link: media.link,
    }))
}

/// List all categories.
async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.article_service.list_categories().await?;

    Ok(ApiResponse::ok(
        categories
            .into_iter()
            .map(|c| CategoryResponse {
                id: c.id,
                name: c.name,
            })
            .collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/create", post(create))
        .route("/media", post(register_media))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{category_id}/articles", get(by_category))
        .route("/{name}", get(show))
}
