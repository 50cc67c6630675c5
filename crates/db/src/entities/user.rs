//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
///
/// Editors may additionally publish articles; the editor-only fields live in
/// [`super::editor_profile`].
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "reader")]
    Reader,
    #[sea_orm(string_value = "editor")]
    Editor,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC-string hash; the plaintext is never stored.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Short profile bio (at most 140 characters).
    #[sea_orm(nullable)]
    pub about_me: Option<String>,

    pub role: Role,

    /// Opaque session token; rotated on login/logout.
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Last time an authenticated request was seen from this account.
    #[sea_orm(nullable)]
    pub last_seen: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,

    #[sea_orm(has_many = "super::article::Entity")]
    Articles,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_one = "super::editor_profile::Entity")]
    EditorProfile,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::editor_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EditorProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
