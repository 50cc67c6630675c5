//! Comment repository.

use std::sync::Arc;

use crate::entities::{comment, Comment};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tanvan_common::{AppError, AppResult};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {id}")))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get comments in a discussion (paginated, newest first).
    pub async fn find_by_discussion(
        &self,
        discussion_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::DiscussionId.eq(discussion_id))
            .order_by_desc(comment::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count comments in a discussion.
    pub async fn count_by_discussion(&self, discussion_id: &str) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::DiscussionId.eq(discussion_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get comments by one author (paginated, newest first).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::UserId.eq(user_id))
            .order_by_desc(comment::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment like count atomically (single UPDATE query, no fetch).
    pub async fn increment_like(&self, comment_id: &str) -> AppResult<()> {
        Comment::update_many()
            .col_expr(
                comment::Column::LikeCount,
                Expr::col(comment::Column::LikeCount).add(1),
            )
            .filter(comment::Column::Id.eq(comment_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment dislike count atomically (single UPDATE query, no fetch).
    pub async fn increment_dislike(&self, comment_id: &str) -> AppResult<()> {
        Comment::update_many()
            .col_expr(
                comment::Column::DislikeCount,
                Expr::col(comment::Column::DislikeCount).add(1),
            )
            .filter(comment::Column::Id.eq(comment_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_comment(id: &str, user_id: &str, discussion_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            body: "a comment".to_string(),
            like_count: 0,
            dislike_count: 0,
            user_id: user_id.to_string(),
            discussion_id: discussion_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_discussion() {
        let c1 = create_test_comment("c1", "u1", "d1");
        let c2 = create_test_comment("c2", "u2", "d1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c2, c1]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_discussion("d1", 10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_increment_like_is_single_update() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.increment_like("c1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_increment_dislike_is_single_update() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.increment_dislike("c1").await;

        assert!(result.is_ok());
    }
}
