//! Article entity (long-form editorial pieces).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Title, unique across all articles.
    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Short teaser shown in listings (at most 128 characters).
    #[sea_orm(nullable)]
    pub synopsis: Option<String>,

    /// Author user ID (must hold the editor role)
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Category is required for every article.
    pub category_id: String,

    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,

    #[sea_orm(has_many = "super::article_tag::Entity")]
    ArticleTags,

    #[sea_orm(has_many = "super::article_media::Entity")]
    ArticleMedia,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_tag::Relation::Article.def().rev())
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_media::Relation::Media.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_media::Relation::Article.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
