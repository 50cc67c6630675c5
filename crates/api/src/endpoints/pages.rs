//! Static content pages.
//!
//! The handful of fixed site pages, served as content descriptors; rendering
//! is the client's concern.

use axum::{
    extract::Path,
    routing::get,
    Router,
};
use serde::Serialize;
use tanvan_common::{AppError, AppResult};

use crate::{middleware::AppState, response::ApiResponse};

/// A static site page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePage {
    pub slug: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

/// The fixed pages of the site.
const PAGES: &[(&str, &str, &str)] = &[
    (
        "tan-van",
        "Tản văn",
        "Essays and prose on the early Lê dynasty.",
    ),
    (
        "dong-thoi-gian",
        "Dòng thời gian",
        "A timeline of the Lê sơ period, 1428-1527.",
    ),
    (
        "trieu-dinh-le-so",
        "Triều đình Lê sơ",
        "The court and administration of the early Lê state.",
    ),
    (
        "nhan-vat-tieu-bieu",
        "Nhân vật tiêu biểu",
        "Notable figures of the period.",
    ),
];

/// List the static pages.
async fn list() -> AppResult<ApiResponse<Vec<SitePage>>> {
    Ok(ApiResponse::ok(
        PAGES
            .iter()
            .map(|&(slug, title, body)| SitePage { slug, title, body })
            .collect(),
    ))
}

/// Get one static page by slug.
async fn show(Path(slug): Path<String>) -> AppResult<ApiResponse<SitePage>> {
    PAGES
        .iter()
        .find(|&&(s, _, _)| s == slug)
        .map(|&(slug, title, body)| ApiResponse::ok(SitePage { slug, title, body }))
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list)).route("/{slug}", get(show))
}
