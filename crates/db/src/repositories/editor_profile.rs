//! Editor profile repository.

use std::sync::Arc;

use crate::entities::{editor_profile, EditorProfile};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use tanvan_common::{AppError, AppResult};

/// Editor profile repository for database operations.
#[derive(Clone)]
pub struct EditorProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl EditorProfileRepository {
    /// Create a new editor profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the editor profile for a user.
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Option<editor_profile::Model>> {
        EditorProfile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an editor profile.
    pub async fn create(
        &self,
        model: editor_profile::ActiveModel,
    ) -> AppResult<editor_profile::Model> {
        model
            .insert(self.db.as_ref())
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
    async fn test_find_by_user_id_found() {
        let profile = editor_profile::Model {
            user_id: "u1".to_string(),
            editor_right: 1,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );

        let repo = EditorProfileRepository::new(db);
        let result = repo.find_by_user_id("u1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().editor_right, 1);
    }

    #[tokio::test]
    async fn test_find_by_user_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<editor_profile::Model>::new()])
                .into_connection(),
        );

        let repo = EditorProfileRepository::new(db);
        let result = repo.find_by_user_id("u2").await.unwrap();

        assert!(result.is_none());
    }
}
