//! Post service.

use sea_orm::Set;
use serde::Deserialize;
use tanvan_common::{AppResult, IdGenerator};
use tanvan_db::{entities::post, repositories::PostRepository};
use validator::Validate;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 140, message = "must be between 1 and 140 characters"))]
    pub body: String,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(post_repo: PostRepository) -> Self {
        Self {
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post.
    pub async fn create(&self, user_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            body: Set(input.body),
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.post_repo.create(model).await
    }

    /// Count posts by one author.
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        self.post_repo.count_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_input_validation() {
        let input = CreatePostInput {
            body: String::new(),
        };
        assert!(input.validate().is_err());

        let input = CreatePostInput {
            body: "a".repeat(141),
        };
        assert!(input.validate().is_err());

        let input = CreatePostInput {
            body: "hello world".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
