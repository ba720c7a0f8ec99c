use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string_len(Accounts::Email, 254).unique_key())
                    .col(string_len(Accounts::Username, 150).unique_key())
                    .col(string(Accounts::Password))
                    .col(string_null(Accounts::ProfileImage))
                    .col(boolean(Accounts::IsStaff).default(false))
                    .col(boolean(Accounts::IsSuperuser).default(false))
                    .col(boolean(Accounts::IsActive).default(true))
                    .col(timestamp_with_time_zone(Accounts::DateJoined))
                    .to_owned(),
            )
            .await?;

        // Create follows table (explicit edge entity)
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(pk_auto(Follows::Id))
                    .col(integer(Follows::FollowerId))
                    .col(integer(Follows::FollowingId))
                    .col(timestamp_with_time_zone(Follows::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_follower")
                            .from(Follows::Table, Follows::FollowerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_following")
                            .from(Follows::Table, Follows::FollowingId)
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
                    .name("uq_follows_follower_following")
                    .table(Follows::Table)
                    .col(Follows::FollowerId)
                    .col(Follows::FollowingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Reverse lookups ("who follows me")
        manager
            .create_index(
                Index::create()
                    .name("idx_follows_following")
                    .table(Follows::Table)
                    .col(Follows::FollowingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Accounts {
    Table,
    Id,
    Email,
    Username,
    Password,
    ProfileImage,
    IsStaff,
    IsSuperuser,
    IsActive,
    DateJoined,
}

#[derive(DeriveIden)]
enum Follows {
    Table,
    Id,
    FollowerId,
    FollowingId,
    CreatedAt,
}
