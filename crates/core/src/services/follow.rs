//! Follow service: the directed social graph.

use sea_orm::Set;
use tanvan_common::{AppError, AppResult, IdGenerator};
use tanvan_db::{
    entities::follow,
    repositories::FollowRepository,
};

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(follow_repo: FollowRepository) -> Self {
        Self {
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    ///
    /// Idempotent: following an already-followed user is a no-op, and a
    /// concurrent duplicate insert is absorbed by the storage-level unique
    /// edge constraint. Self-follow is rejected here so the rule lives in
    /// exactly one place.
    pub async fn follow(&self, follower_id: &str, followed_id: &str) -> AppResult<()> {
        if follower_id == followed_id {
            return Err(AppError::BadRequest(
                "you cannot follow yourself".to_string(),
            ));
        }

        if self
            .follow_repo
            .is_following(follower_id, followed_id)
            .await?
        {
            return Ok(());
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            followed_id: Set(followed_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        // None means another request created the edge first; same outcome.
        self.follow_repo.create(model).await?;
        Ok(())
    }

    /// Unfollow a user. Unfollowing a non-followed user is a no-op.
    pub async fn unfollow(&self, follower_id: &str, followed_id: &str) -> AppResult<()> {
        if follower_id == followed_id {
            return Err(AppError::BadRequest(
                "you cannot unfollow yourself".to_string(),
            ));
        }

        self.follow_repo
            .delete_by_pair(follower_id, followed_id)
            .await
    }

    /// Check if a user is following another.
    pub async fn is_following(&self, follower_id: &str, followed_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, followed_id).await
    }

    /// Get the IDs of every user a user follows.
    pub async fn followed_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.follow_repo.find_followed_ids(user_id).await
    }

    /// Get follower edges of a user (paginated).
    pub async fn followers(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<follow::Model>> {
        self.follow_repo.find_followers(user_id, limit, offset).await
    }

    /// Get following edges of a user (paginated).
    pub async fn following(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<follow::Model>> {
        self.follow_repo.find_following(user_id, limit, offset).await
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        self.follow_repo.count_followers(user_id).await
    }

    /// Count users a user is following.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        self.follow_repo.count_following(user_id).await
    }
}
