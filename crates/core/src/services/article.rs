//! Article service: the editorial publishing path.

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tanvan_common::{AppError, AppResult, IdGenerator};
use tanvan_db::{
    entities::{article, category, media, tag, user},
    repositories::{ArticleRepository, CategoryRepository, MediaRepository, TagRepository},
};
use validator::Validate;

use crate::services::timeline::{into_page, page_window, Page};

/// Input for registering a media item.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterMediaInput {
    #[validate(length(max = 128, message = "must be at most 128 characters"))]
    pub author: Option<String>,

    pub source: Option<String>,

    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub source_type: Option<String>,

    /// External URL of the material.
    pub link: Option<String>,
}

/// Input for creating an article.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleInput {
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub body: String,

    #[validate(length(max = 128, message = "must be at most 128 characters"))]
    pub synopsis: Option<String>,

    /// Category is required for every article.
    pub category_id: String,

    /// Tag names; missing tags are created on the fly.
    #[serde(default)]
    pub tags: Vec<String>,

    /// IDs of already-registered media items to link.
    #[serde(default)]
    pub media_ids: Vec<String>,
}

/// An article with its category, tags and media resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    /// The article row.
    pub article: article::Model,
    /// Its category.
    pub category: Option<category::Model>,
    /// Linked tags, alphabetically.
    pub tags: Vec<tag::Model>,
    /// Linked media items.
    pub media: Vec<media::Model>,
}

/// Article service for business logic.
#[derive(Clone)]
pub struct ArticleService {
    article_repo: ArticleRepository,
    category_repo: CategoryRepository,
    tag_repo: TagRepository,
    media_repo: MediaRepository,
    id_gen: IdGenerator,
}

impl ArticleService {
    /// Create a new article service.
    #[must_use]
    pub fn new(
        article_repo: ArticleRepository,
        category_repo: CategoryRepository,
        tag_repo: TagRepository,
        media_repo: MediaRepository,
    ) -> Self {
        Self {
            article_repo,
            category_repo,
            tag_repo,
            media_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish a new article.
    ///
    /// Only editors may publish. The category must exist, and the article
    /// name is unique (advisory pre-check; the storage index decides races).
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreateArticleInput,
    ) -> AppResult<ArticleView> {
        input.validate()?;

        if author.role != user::Role::Editor {
            return Err(AppError::Forbidden(
                "only editors can publish articles".to_string(),
            ));
        }

        let category = self
            .category_repo
            .find_by_id(&input.category_id)
            .await?
            .ok_or_else(|| AppError::Validation("unknown category".to_string()))?;

        if self.article_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Validation(
                "an article with this name already exists".to_string(),
            ));
        }

        // Media must be registered before it can be referenced.
        let media = self.media_repo.find_by_ids(&input.media_ids).await?;
        if media.len() != input.media_ids.len() {
            return Err(AppError::Validation(
                "unknown media reference".to_string(),
            ));
        }

        let model = article::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            body: Set(input.body),
            synopsis: Set(input.synopsis),
            user_id: Set(author.id.clone()),
            category_id: Set(category.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let article = self.article_repo.create(model).await?;

        let mut tags = Vec::with_capacity(input.tags.len());
        for name in &input.tags {
            let tag = self.get_or_create_tag(name).await?;
            self.article_repo.add_tag(&article.id, &tag.id).await?;
            tags.push(tag);
        }
        tags.sort_by(|a, b| a.name.cmp(&b.name));

        for item in &media {
            self.article_repo.add_media(&article.id, &item.id).await?;
        }

        Ok(ArticleView {
            article,
            category: Some(category),
            tags,
            media,
        })
    }

    async fn get_or_create_tag(&self, name: &str) -> AppResult<tag::Model> {
        if let Some(existing) = self.tag_repo.find_by_name(name).await? {
            return Ok(existing);
        }

        let model = tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        // A lost create race means someone else just made it; re-read.
        match self.tag_repo.create(model).await? {
            Some(created) => Ok(created),
            None => self
                .tag_repo
                .find_by_name(name)
                .await?
                .ok_or_else(|| AppError::Internal(format!("tag {name} vanished"))),
        }
    }

    /// Get an article by name, with category, tags and media resolved.
    pub async fn get_by_name(&self, name: &str) -> AppResult<ArticleView> {
        let article = self
            .article_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::ArticleNotFound(name.to_string()))?;

        let category = self.category_repo.find_by_id(&article.category_id).await?;
        let tags = self.article_repo.find_tags(&article.id).await?;
        let media = self.article_repo.find_media(&article.id).await?;

        Ok(ArticleView {
            article,
            category,
            tags,
            media,
        })
    }

    /// Recent articles, newest first.
    pub async fn list_recent(&self, page: u64, page_size: u64) -> AppResult<Page<article::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self.article_repo.find_recent(page_size + 1, offset).await?;
        Ok(into_page(items, page, page_size))
    }

    /// One author's articles, newest first.
    pub async fn list_by_author(
        &self,
        user_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<Page<article::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self
            .article_repo
            .find_by_author(user_id, page_size + 1, offset)
            .await?;
        Ok(into_page(items, page, page_size))
    }

    /// Articles in one category, newest first.
    pub async fn list_by_category(
        &self,
        category_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<Page<article::Model>> {
        let (page, offset) = page_window(page, page_size);
        let items = self
            .article_repo
            .find_by_category(category_id, page_size + 1, offset)
            .await?;
        Ok(into_page(items, page, page_size))
    }

    /// Create a category.
    pub async fn create_category(&self, name: &str) -> AppResult<category::Model> {
        if name.is_empty() || name.len() > 50 {
            return Err(AppError::Validation(
                "category name must be between 1 and 50 characters".to_string(),
            ));
        }

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.category_repo.create(model).await
    }

    /// List all categories.
    pub async fn list_categories(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.list().await
    }

    /// Register a media item so articles can reference it (editors only).
    pub async fn register_media(
        &self,
        user: &user::Model,
        input: RegisterMediaInput,
    ) -> AppResult<media::Model> {
        input.validate()?;

        if user.role != user::Role::Editor {
            return Err(AppError::Forbidden(
                "only editors can register media".to_string(),
            ));
        }

        let model = media::ActiveModel {
            id: Set(self.id_gen.generate()),
            author: Set(input.author),
            source: Set(input.source),
            source_type: Set(input.source_type),
            retrieved_at: Set(Some(chrono::Utc::now().into())),
            link: Set(input.link),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.media_repo.create(model).await
    }
}
