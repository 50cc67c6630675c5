//! Create media and article_media tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Media::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Media::Author).string_len(128))
                    .col(ColumnDef::new(Media::Source).text())
                    .col(ColumnDef::new(Media::SourceType).string_len(64))
                    .col(ColumnDef::new(Media::RetrievedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Media::Link).text())
                    .col(
                        ColumnDef::new(Media::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ArticleMedia::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ArticleMedia::ArticleId).string_len(32).not_null())
                    .col(ColumnDef::new(ArticleMedia::MediaId).string_len(32).not_null())
                    .primary_key(
                        Index::create()
                            .col(ArticleMedia::ArticleId)
                            .col(ArticleMedia::MediaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_media_article")
                            .from(ArticleMedia::Table, ArticleMedia::ArticleId)
                            .to(Article::Table, Article::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_media_media")
                            .from(ArticleMedia::Table, ArticleMedia::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArticleMedia::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Media {
    Table,
    Id,
    Author,
    Source,
    SourceType,
    RetrievedAt,
    Link,
    CreatedAt,
}

#[derive(Iden)]
enum ArticleMedia {
    Table,
    ArticleId,
    MediaId,
}

#[derive(Iden)]
enum Article {
    Table,
    Id,
}
