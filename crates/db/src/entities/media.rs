//! Media entity (externally hosted multimedia referenced by articles).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Credited author of the material.
    #[sea_orm(nullable)]
    pub author: Option<String>,

    /// Where the material was obtained from.
    #[sea_orm(column_type = "Text", nullable)]
    pub source: Option<String>,

    /// Kind of source (book, archive, website, ...).
    #[sea_orm(nullable)]
    pub source_type: Option<String>,

    /// When the material was retrieved from its source.
    #[sea_orm(nullable)]
    pub retrieved_at: Option<DateTimeWithTimeZone>,

    /// External URL of the material itself.
    #[sea_orm(column_type = "Text", nullable)]
    pub link: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article_media::Entity")]
    ArticleMedia,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        super::article_media::Relation::Article.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::article_media::Relation::Media.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
