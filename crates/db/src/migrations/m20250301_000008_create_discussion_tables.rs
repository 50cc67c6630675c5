//! Create discussion and comment tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Discussion::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Discussion::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Discussion::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Discussion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_discussion_name")
                    .table(Discussion::Table)
                    .col(Discussion::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Comment::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Comment::Body).text().not_null())
                    .col(ColumnDef::new(Comment::LikeCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Comment::DislikeCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Comment::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Comment::DiscussionId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_user")
                            .from(Comment::Table, Comment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_discussion")
                            .from(Comment::Table, Comment::DiscussionId)
                            .to(Discussion::Table, Discussion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: discussion_id (thread listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_discussion_id")
                    .table(Comment::Table)
                    .col(Comment::DiscussionId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_created_at")
                    .table(Comment::Table)
                    .col(Comment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Discussion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Discussion {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
    Body,
    LikeCount,
    DislikeCount,
    UserId,
    DiscussionId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
