//! Create article table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Article::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Article::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Article::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Article::Body).text().not_null())
                    .col(ColumnDef::new(Article::Synopsis).string_len(128))
                    .col(ColumnDef::new(Article::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Article::CategoryId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Article::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Article::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_user")
                            .from(Article::Table, Article::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_category")
                            .from(Article::Table, Article::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_article_name")
                    .table(Article::Table)
                    .col(Article::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_id (author listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_article_user_id")
                    .table(Article::Table)
                    .col(Article::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_article_created_at")
                    .table(Article::Table)
                    .col(Article::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Article::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Article {
    Table,
    Id,
    Name,
    Body,
    Synopsis,
    UserId,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
