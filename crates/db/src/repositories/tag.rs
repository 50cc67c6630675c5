//! Tag repository.

use std::sync::Arc;

use crate::entities::{tag, Tag};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr,
};
use tanvan_common::{AppError, AppResult};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tag by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new tag.
    ///
    /// Returns `None` when a tag with this name already exists (a concurrent
    /// get-or-create lost the race); the caller should re-read.
    pub async fn create(&self, model: tag::ActiveModel) -> AppResult<Option<tag::Model>> {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_name_found() {
        let t1 = tag::Model {
            id: "t1".to_string(),
            name: "dynasty".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_by_name("dynasty").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_find_by_name_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tag::Model>::new()])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_by_name("missing").await.unwrap();

        assert!(result.is_none());
    }
}
