//! Create `artist_social` and `group_social` link tables.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArtistSocial::Table)
                    .if_not_exists()
                    .col(pk_auto(ArtistSocial::Id))
                    .col(integer(ArtistSocial::ArtistId).not_null())
                    .col(string_len(ArtistSocial::Platform, 30).default("other"))
                    .col(string_len(ArtistSocial::Url, 200).not_null())
                    .col(timestamp_with_time_zone(ArtistSocial::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_social_artist")
                            .from(ArtistSocial::Table, ArtistSocial::ArtistId)
                            .to(ArtistProfile::Table, ArtistProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GroupSocial::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupSocial::Id))
                    .col(integer(GroupSocial::CollectiveId).not_null())
                    .col(string_len(GroupSocial::Platform, 30).default("other"))
                    .col(string_len(GroupSocial::Url, 200).not_null())
                    .col(timestamp_with_time_zone(GroupSocial::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_social_collective")
                            .from(GroupSocial::Table, GroupSocial::CollectiveId)
                            .to(Collective::Table, Collective::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GroupSocial::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ArtistSocial::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ArtistSocial { Table, Id, ArtistId, Platform, Url, CreatedAt }

#[derive(DeriveIden)]
enum GroupSocial { Table, Id, CollectiveId, Platform, Url, CreatedAt }

#[derive(DeriveIden)]
enum ArtistProfile { Table, Id }

#[derive(DeriveIden)]
enum Collective { Table, Id }
