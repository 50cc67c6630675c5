//! Follow repository.

use std::sync::Arc;

use crate::entities::{follow, Follow};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use tanvan_common::{AppError, AppResult};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow edge by follower and followed user.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        followed_id: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowedId.eq(followed_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followed_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, followed_id).await?.is_some())
    }

    /// Create a follow edge.
    ///
    /// Returns `None` when the edge already exists: the composite unique
    /// index decides races that slip past the caller's existence check.
    pub async fn create(&self, model: follow::ActiveModel) -> AppResult<Option<follow::Model>> {
        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Ok(None)
                } else {
                    Err(AppError::Database(e.to_string()))
                }
            }
        }
    }

    /// Delete a follow edge by pair. Deleting an absent edge is a no-op.
    pub async fn delete_by_pair(&self, follower_id: &str, followed_id: &str) -> AppResult<()> {
        let edge = self.find_by_pair(follower_id, followed_id).await?;
        if let Some(f) = edge {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get the IDs of all users a user follows (for feed assembly).
    pub async fn find_followed_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map(|edges| edges.into_iter().map(|f| f.followed_id).collect())
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get edges for users following a user (paginated).
    pub async fn find_followers(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get edges for users a user is following (paginated).
    pub async fn find_following(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users a user is following.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
