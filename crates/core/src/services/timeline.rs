//! Timeline service: derived, always-recomputed feed views.

use serde::Serialize;
use tanvan_common::AppResult;
use tanvan_db::{
    entities::{article, post},
    repositories::{ArticleRepository, FollowRepository, PostRepository},
};

/// One page of an ordered listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page, newest first.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// Normalize a 1-based page number into an offset window.
pub(crate) const fn page_window(page: u64, page_size: u64) -> (u64, u64) {
    let page = if page == 0 { 1 } else { page };
    (page, (page - 1) * page_size)
}

/// Build a page from a `page_size + 1` overfetch.
pub(crate) fn into_page<T>(mut items: Vec<T>, page: u64, page_size: u64) -> Page<T> {
    let has_next = items.len() as u64 > page_size;
    items.truncate(usize::try_from(page_size).unwrap_or(usize::MAX));
    Page {
        items,
        page,
        has_next,
        has_prev: page > 1,
    }
}

/// A post or an article behind one common surface.
///
/// Both content kinds share `{id, author, timestamp, body}`; listings that
/// mix them dispatch through this enum instead of duplicating per-kind code.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PostVariant {
    /// A microblog post.
    Post(post::Model),
    /// An editorial article.
    Article(article::Model),
}

impl PostVariant {
    /// Entity ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Post(p) => &p.id,
            Self::Article(a) => &a.id,
        }
    }

    /// Author user ID.
    #[must_use]
    pub fn author_id(&self) -> &str {
        match self {
            Self::Post(p) => &p.user_id,
            Self::Article(a) => &a.user_id,
        }
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> &sea_orm::prelude::DateTimeWithTimeZone {
        match self {
            Self::Post(p) => &p.created_at,
            Self::Article(a) => &a.created_at,
        }
    }

    /// Body text.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Post(p) => &p.body,
            Self::Article(a) => &a.body,
        }
    }
}

/// Timeline service for derived feed queries.
#[derive(Clone)]
pub struct TimelineService {
    post_repo: PostRepository,
    article_repo: ArticleRepository,
    follow_repo: FollowRepository,
}

impl TimelineService {
    /// Create a new timeline service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        article_repo: ArticleRepository,
        follow_repo: FollowRepository,
    ) -> Self {
        Self {
            post_repo,
            article_repo,
            follow_repo,
        }
    }

    /// The followed-posts feed: the union of the user's own posts and posts
    /// by everyone they follow, newest first.
    pub async fn followed_posts(
        &self,
        user_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<Page<post::Model>> {
        let (page, offset) = page_window(page, page_size);
        let followed_ids = self.follow_repo.find_followed_ids(user_id).await?;

        let items = self
            .post_repo
            .find_feed(user_id, &followed_ids, page_size + 1, offset)
            .await?;

        Ok(into_page(items, page, page_size))
    }

    /// All posts, newest first (the explore view).
    pub async fn explore(&self, page: u64, page_size: u64) -> AppResult<Page<post::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self.post_repo.find_all(page_size + 1, offset).await?;
        Ok(into_page(items, page, page_size))
    }

    /// One author's posts, newest first (the profile view).
    pub async fn user_posts(
        &self,
        user_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<Page<post::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self
            .post_repo
            .find_by_user(user_id, page_size + 1, offset)
            .await?;
        Ok(into_page(items, page, page_size))
    }

    /// One author's posts and articles merged, newest first.
    pub async fn author_activity(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<PostVariant>> {
        let posts = self.post_repo.find_by_user(user_id, limit, 0).await?;
        let articles = self.article_repo.find_by_author(user_id, limit, 0).await?;

        let mut merged: Vec<PostVariant> = posts
            .into_iter()
            .map(PostVariant::Post)
            .chain(articles.into_iter().map(PostVariant::Article))
            .collect();

        merged.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        merged.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(merged)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_post(id: &str, user_id: &str, body: &str, minutes_ago: i64) -> post::Model {
        post::Model {
            id: id.to_string(),
            body: body.to_string(),
            user_id: user_id.to_string(),
            created_at: (Utc::now() - Duration::minutes(minutes_ago)).into(),
        }
    }

    fn create_test_article(id: &str, user_id: &str, minutes_ago: i64) -> article::Model {
        article::Model {
            id: id.to_string(),
            name: format!("article-{id}"),
            body: "article body".to_string(),
            synopsis: None,
            user_id: user_id.to_string(),
            category_id: "c1".to_string(),
            created_at: (Utc::now() - Duration::minutes(minutes_ago)).into(),
            updated_at: None,
        }
    }

    fn create_test_service(
        post_db: Arc<sea_orm::DatabaseConnection>,
        article_db: Arc<sea_orm::DatabaseConnection>,
        follow_db: Arc<sea_orm::DatabaseConnection>,
    ) -> TimelineService {
        TimelineService::new(
            PostRepository::new(post_db),
            ArticleRepository::new(article_db),
            FollowRepository::new(follow_db),
        )
    }

    #[test]
    fn test_page_window_normalizes_page_zero() {
        assert_eq!(page_window(0, 25), (1, 0));
        assert_eq!(page_window(1, 25), (1, 0));
        assert_eq!(page_window(3, 25), (3, 50));
    }

    #[test]
    fn test_into_page_flags() {
        // Overfetch of one signals a next page.
        let page = into_page(vec![1, 2, 3], 1, 2);
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let page = into_page(vec![3], 2, 2);
        assert_eq!(page.items, vec![3]);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[tokio::test]
    async fn test_followed_posts_empty_for_lonely_user() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let article_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        // No follow edges either.
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tanvan_db::entities::follow::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(post_db, article_db, follow_db);
        let result = service.followed_posts("u1", 1, 25).await.unwrap();

        assert!(result.items.is_empty());
        assert!(!result.has_next);
        assert!(!result.has_prev);
    }

    #[tokio::test]
    async fn test_followed_posts_orders_newest_first() {
        let newer = create_test_post("p2", "u1", "world", 0);
        let older = create_test_post("p1", "u2", "hello", 10);

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[newer, older]])
                .into_connection(),
        );
        let article_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![tanvan_db::entities::follow::Model {
                    id: "f1".to_string(),
                    follower_id: "u1".to_string(),
                    followed_id: "u2".to_string(),
                    created_at: Utc::now().into(),
                }]])
                .into_connection(),
        );

        let service = create_test_service(post_db, article_db, follow_db);
        let result = service.followed_posts("u1", 1, 25).await.unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].body, "world");
        assert_eq!(result.items[1].body, "hello");
    }

    #[tokio::test]
    async fn test_explore_pagination_flags() {
        // Three rows for page_size 2: page 1 has a next page.
        let p1 = create_test_post("p1", "u1", "one", 1);
        let p2 = create_test_post("p2", "u1", "two", 2);
        let p3 = create_test_post("p3", "u1", "three", 3);

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2, p3]])
                .into_connection(),
        );
        let article_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let follow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(post_db, article_db, follow_db);
        let result = service.explore(1, 2).await.unwrap();

        assert_eq!(result.items.len(), 2);
        assert!(result.has_next);
        assert!(!result.has_prev);
    }

    #[tokio::test]
    async fn test_author_activity_merges_posts_and_articles() {
        let post = create_test_post("p1", "u1", "a post", 5);
        let article = create_test_article("a1", "u1", 1);

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        let article_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[article]])
                .into_connection(),
        );
        let follow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(post_db, article_db, follow_db);
        let result = service.author_activity("u1", 10).await.unwrap();

        assert_eq!(result.len(), 2);
        // The article is newer, so it leads.
        assert!(matches!(result[0], PostVariant::Article(_)));
        assert!(matches!(result[1], PostVariant::Post(_)));
        assert_eq!(result[1].body(), "a post");
    }
}
