//! Media repository.

use std::sync::Arc;

use crate::entities::{media, Media};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tanvan_common::{AppError, AppResult};

/// Media repository for database operations.
#[derive(Clone)]
pub struct MediaRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaRepository {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a media item by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<media::Model>> {
        Media::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find media items by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<media::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Media::find()
            .filter(media::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new media item.
    pub async fn create(&self, model: media::ActiveModel) -> AppResult<media::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
