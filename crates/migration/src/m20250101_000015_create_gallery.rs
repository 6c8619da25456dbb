//! Create `artist_image` and `group_image`.
//!
//! The per-owner image cap lives in the model layer; the tables only carry
//! the owner FK with cascade.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArtistImage::Table)
                    .if_not_exists()
                    .col(pk_auto(ArtistImage::Id))
                    .col(integer(ArtistImage::ArtistId).not_null())
                    .col(string_len(ArtistImage::Image, 255).not_null())
                    .col(ColumnDef::new(ArtistImage::Title).string_len(150).null())
                    .col(small_integer(ArtistImage::Position).default(0))
                    .col(timestamp_with_time_zone(ArtistImage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_image_artist")
                            .from(ArtistImage::Table, ArtistImage::ArtistId)
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
                    .table(GroupImage::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupImage::Id))
                    .col(integer(GroupImage::CollectiveId).not_null())
                    .col(string_len(GroupImage::Image, 255).not_null())
                    .col(ColumnDef::new(GroupImage::Title).string_len(150).null())
                    .col(small_integer(GroupImage::Position).default(0))
                    .col(timestamp_with_time_zone(GroupImage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_image_collective")
                            .from(GroupImage::Table, GroupImage::CollectiveId)
                            .to(Collective::Table, Collective::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GroupImage::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ArtistImage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ArtistImage { Table, Id, ArtistId, Image, Title, Position, CreatedAt }

#[derive(DeriveIden)]
enum GroupImage { Table, Id, CollectiveId, Image, Title, Position, CreatedAt }

#[derive(DeriveIden)]
enum ArtistProfile { Table, Id }

#[derive(DeriveIden)]
enum Collective { Table, Id }
