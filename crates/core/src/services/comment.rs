//! Comment service: discussions and their comments.

use sea_orm::Set;
use serde::Deserialize;
use tanvan_common::{AppError, AppResult, IdGenerator};
use tanvan_db::{
    entities::{comment, discussion},
    repositories::{CommentRepository, DiscussionRepository},
};
use validator::Validate;

use crate::services::timeline::{into_page, page_window, Page};

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    /// Discussion the comment belongs to.
    pub discussion_id: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub body: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    discussion_repo: DiscussionRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, discussion_repo: DiscussionRepository) -> Self {
        Self {
            comment_repo,
            discussion_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a discussion.
    pub async fn create_discussion(&self, name: &str) -> AppResult<discussion::Model> {
        if name.is_empty() || name.len() > 64 {
            return Err(AppError::Validation(
                "discussion name must be between 1 and 64 characters".to_string(),
            ));
        }

        if self.discussion_repo.find_by_name(name).await?.is_some() {
            return Err(AppError::Validation(
                "a discussion with this name already exists".to_string(),
            ));
        }

        let model = discussion::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.discussion_repo.create(model).await
    }

    /// List discussions, newest first.
    pub async fn list_discussions(
        &self,
        page: u64,
        page_size: u64,
    ) -> AppResult<Page<discussion::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self.discussion_repo.list(page_size + 1, offset).await?;
        Ok(into_page(items, page, page_size))
    }

    /// Add a comment to a discussion.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        // The discussion must exist before anything is written.
        let discussion = self.discussion_repo.get_by_id(&input.discussion_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            body: Set(input.body),
            user_id: Set(user_id.to_string()),
            discussion_id: Set(discussion.id),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        self.comment_repo.create(model).await
    }

    /// Comments in a discussion, newest first.
    pub async fn list_for_discussion(
        &self,
        discussion_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<Page<comment::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self
            .comment_repo
            .find_by_discussion(discussion_id, page_size + 1, offset)
            .await?;
        Ok(into_page(items, page, page_size))
    }

    /// Comments by one author across all discussions, newest first.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<Page<comment::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self
            .comment_repo
            .find_by_user(user_id, page_size + 1, offset)
            .await?;
        Ok(into_page(items, page, page_size))
    }

    /// Like a comment.
    pub async fn like(&self, comment_id: &str) -> AppResult<()> {
        self.comment_repo.get_by_id(comment_id).await?;
        self.comment_repo.increment_like(comment_id).await
    }

    /// Dislike a comment.
    pub async fn dislike(&self, comment_id: &str) -> AppResult<()> {
        self.comment_repo.get_by_id(comment_id).await?;
        self.comment_repo.increment_dislike(comment_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_service(
        comment_db: Arc<sea_orm::DatabaseConnection>,
        discussion_db: Arc<sea_orm::DatabaseConnection>,
    ) -> CommentService {
        CommentService::new(
            CommentRepository::new(comment_db),
            DiscussionRepository::new(discussion_db),
        )
    }

    #[tokio::test]
    async fn test_create_discussion_duplicate_name_is_validation_failure() {
        let existing = discussion::Model {
            id: "d1".to_string(),
            name: "timeline-corrections".to_string(),
            created_at: Utc::now().into(),
        };

        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let discussion_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = create_test_service(comment_db, discussion_db);
        let result = service.create_discussion("timeline-corrections").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_comment_in_missing_discussion_is_not_found() {
        let comment_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let discussion_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<discussion::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(comment_db, discussion_db);
        let result = service
            .create(
                "u1",
                CreateCommentInput {
                    discussion_id: "missing".to_string(),
                    body: "hello".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_like_missing_comment_is_not_found() {
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );
        let discussion_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(comment_db, discussion_db);
        let result = service.like("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_create_comment_input_validation() {
        let input = CreateCommentInput {
            discussion_id: "d1".to_string(),
            body: String::new(),
        };
        assert!(input.validate().is_err());

        let input = CreateCommentInput {
            discussion_id: "d1".to_string(),
            body: "a comment".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
