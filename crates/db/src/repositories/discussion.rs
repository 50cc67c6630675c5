//! Discussion repository.

use std::sync::Arc;

use crate::entities::{discussion, Discussion};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};
use tanvan_common::{AppError, AppResult};

/// Discussion repository for database operations.
#[derive(Clone)]
pub struct DiscussionRepository {
    db: Arc<DatabaseConnection>,
}

impl DiscussionRepository {
    /// Create a new discussion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a discussion by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<discussion::Model>> {
        Discussion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a discussion by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<discussion::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("discussion {id}")))
    }

    /// Find a discussion by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<discussion::Model>> {
        Discussion::find()
            .filter(discussion::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new discussion.
    pub async fn create(&self, model: discussion::ActiveModel) -> AppResult<discussion::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::Validation("a discussion with this name already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// List discussions (paginated, newest first).
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<discussion::Model>> {
        Discussion::find()
            .order_by_desc(discussion::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_name_found() {
        let d1 = discussion::Model {
            id: "d1".to_string(),
            name: "timeline-corrections".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[d1]])
                .into_connection(),
        );

        let repo = DiscussionRepository::new(db);
        let result = repo.find_by_name("timeline-corrections").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<discussion::Model>::new()])
                .into_connection(),
        );

        let repo = DiscussionRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
