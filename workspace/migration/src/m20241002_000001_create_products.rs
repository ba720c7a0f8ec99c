use sea_orm_migration::{prelude::*, schema::*};

use crate::m20241001_000001_create_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string_len(Categories::Name, 100).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create hashtags table
        manager
            .create_table(
                Table::create()
                    .table(Hashtags::Table)
                    .if_not_exists()
                    .col(pk_auto(Hashtags::Id))
                    .col(string_len(Hashtags::Name, 50).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string_len(Products::Title, 50))
                    .col(text(Products::Content))
                    .col(string_len(Products::ProductName, 100))
                    .col(big_integer(Products::Price).check(Expr::col(Products::Price).gte(0)))
                    .col(big_integer(Products::Quantity).check(Expr::col(Products::Quantity).gte(0)))
                    .col(string_null(Products::Image))
                    .col(
                        big_integer(Products::Views)
                            .default(0)
                            .check(Expr::col(Products::Views).gte(0)),
                    )
                    .col(integer(Products::AuthorId))
                    .col(integer(Products::CategoryId))
                    .col(timestamp_with_time_zone(Products::CreatedAt))
                    .col(timestamp_with_time_zone(Products::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_author")
                            .from(Products::Table, Products::AuthorId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_author")
                    .table(Products::Table)
                    .col(Products::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Create product_likes table (join table)
        manager
            .create_table(
                Table::create()
                    .table(ProductLikes::Table)
                    .if_not_exists()
                    .col(integer(ProductLikes::ProductId))
                    .col(integer(ProductLikes::AccountId))
                    .col(timestamp_with_time_zone(ProductLikes::CreatedAt))
                    .primary_key(
                        Index::create()
                            .name("pk_product_likes")
                            .col(ProductLikes::ProductId)
                            .col(ProductLikes::AccountId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_likes_product")
                            .from(ProductLikes::Table, ProductLikes::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_likes_account")
                            .from(ProductLikes::Table, ProductLikes::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_likes_account")
                    .table(ProductLikes::Table)
                    .col(ProductLikes::AccountId)
                    .to_owned(),
            )
            .await?;

        // Create product_hashtags table (join table)
        manager
            .create_table(
                Table::create()
                    .table(ProductHashtags::Table)
                    .if_not_exists()
                    .col(integer(ProductHashtags::ProductId))
                    .col(integer(ProductHashtags::HashtagId))
                    .primary_key(
                        Index::create()
                            .name("pk_product_hashtags")
                            .col(ProductHashtags::ProductId)
                            .col(ProductHashtags::HashtagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_hashtags_product")
                            .from(ProductHashtags::Table, ProductHashtags::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_hashtags_hashtag")
                            .from(ProductHashtags::Table, ProductHashtags::HashtagId)
                            .to(Hashtags::Table, Hashtags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_hashtags_hashtag")
                    .table(ProductHashtags::Table)
                    .col(ProductHashtags::HashtagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(ProductHashtags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProductLikes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Hashtags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Hashtags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Title,
    Content,
    ProductName,
    Price,
    Quantity,
    Image,
    Views,
    AuthorId,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductLikes {
    Table,
    ProductId,
    AccountId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProductHashtags {
    Table,
    ProductId,
    HashtagId,
}
