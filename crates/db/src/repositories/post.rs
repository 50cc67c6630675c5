//! Post repository.

use std::sync::Arc;

use crate::entities::{post, Post};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tanvan_common::{AppError, AppResult};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get posts by one author (paginated, newest first).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts by one author.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the followed-posts feed: posts authored by the user or by anyone
    /// the user follows, newest first.
    ///
    /// The set union of own and followed posts falls out of a single
    /// `user_id IN (...)` filter, which also deduplicates for free. The view
    /// is recomputed on every call; nothing is materialized.
    pub async fn find_feed(
        &self,
        user_id: &str,
        followed_ids: &[String],
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<post::Model>> {
        let mut author_ids = followed_ids.to_vec();
        author_ids.push(user_id.to_string());

        Post::find()
            .filter(post::Column::UserId.is_in(author_ids))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the posts visible in a user's feed.
    pub async fn count_feed(&self, user_id: &str, followed_ids: &[String]) -> AppResult<u64> {
        let mut author_ids = followed_ids.to_vec();
        author_ids.push(user_id.to_string());

        Post::find()
            .filter(post::Column::UserId.is_in(author_ids))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all posts (paginated, newest first).
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<post::Model>> {
        Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all posts.
    pub async fn count(&self) -> AppResult<u64> {
        Post::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
