//! Article repository.

use std::sync::Arc;

use crate::entities::{article, article_media, article_tag, media, tag, Article, Media, Tag};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr,
};
use tanvan_common::{AppError, AppResult};

/// Article repository for database operations.
#[derive(Clone)]
pub struct ArticleRepository {
    db: Arc<DatabaseConnection>,
}

impl ArticleRepository {
    /// Create a new article repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an article by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<article::Model>> {
        Article::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an article by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<article::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ArticleNotFound(id.to_string()))
    }

    /// Find an article by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<article::Model>> {
        Article::find()
            .filter(article::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new article.
    pub async fn create(&self, model: article::ActiveModel) -> AppResult<article::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::Validation("an article with this name already exists".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Get recent articles (paginated, newest first).
    pub async fn find_recent(&self, limit: u64, offset: u64) -> AppResult<Vec<article::Model>> {
        Article::find()
            .order_by_desc(article::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get articles by one author (paginated, newest first).
    pub async fn find_by_author(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<article::Model>> {
        Article::find()
            .filter(article::Column::UserId.eq(user_id))
            .order_by_desc(article::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get articles in one category (paginated, newest first).
    pub async fn find_by_category(
        &self,
        category_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<article::Model>> {
        Article::find()
            .filter(article::Column::CategoryId.eq(category_id))
            .order_by_desc(article::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all articles.
    pub async fn count(&self) -> AppResult<u64> {
        Article::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Link a tag to an article. Linking twice is a no-op.
    pub async fn add_tag(&self, article_id: &str, tag_id: &str) -> AppResult<()> {
        let model = article_tag::ActiveModel {
            article_id: sea_orm::Set(article_id.to_string()),
            tag_id: sea_orm::Set(tag_id.to_string()),
        };
        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(()),
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Ok(())
                } else {
                    Err(AppError::Database(e.to_string()))
                }
            }
        }
    }

    /// Link a media item to an article. Linking twice is a no-op.
    pub async fn add_media(&self, article_id: &str, media_id: &str) -> AppResult<()> {
        let model = article_media::ActiveModel {
            article_id: sea_orm::Set(article_id.to_string()),
            media_id: sea_orm::Set(media_id.to_string()),
        };
        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(()),
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Ok(())
                } else {
                    Err(AppError::Database(e.to_string()))
                }
            }
        }
    }

    /// Get the tags linked to an article.
    pub async fn find_tags(&self, article_id: &str) -> AppResult<Vec<tag::Model>> {
        Tag::find()
            .join(JoinType::InnerJoin, tag::Relation::ArticleTags.def())
            .filter(article_tag::Column::ArticleId.eq(article_id))
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the media items linked to an article.
    pub async fn find_media(&self, article_id: &str) -> AppResult<Vec<media::Model>> {
        Media::find()
            .join(JoinType::InnerJoin, media::Relation::ArticleMedia.def())
            .filter(article_media::Column::ArticleId.eq(article_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
