//! Create `collective` with its membership and genre association tables.
//!
//! The administrator owns the collective: deleting the user removes it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collective::Table)
                    .if_not_exists()
                    .col(pk_auto(Collective::Id))
                    .col(string_len(Collective::Name, 200).not_null())
                    .col(string_len(Collective::Slug, 220).unique_key().not_null())
                    .col(integer(Collective::AdminId).not_null())
                    .col(ColumnDef::new(Collective::Description).text().null())
                    .col(ColumnDef::new(Collective::ProfileImage).string_len(255).null())
                    .col(timestamp_with_time_zone(Collective::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Collective::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collective_admin")
                            .from(Collective::Table, Collective::AdminId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CollectiveMember::Table)
                    .if_not_exists()
                    .col(integer(CollectiveMember::CollectiveId).not_null())
                    .col(integer(CollectiveMember::ArtistProfileId).not_null())
                    .primary_key(
                        Index::create()
                            .col(CollectiveMember::CollectiveId)
                            .col(CollectiveMember::ArtistProfileId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collective_member_collective")
                            .from(CollectiveMember::Table, CollectiveMember::CollectiveId)
                            .to(Collective::Table, Collective::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collective_member_profile")
                            .from(CollectiveMember::Table, CollectiveMember::ArtistProfileId)
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
                    .table(CollectiveGenre::Table)
                    .if_not_exists()
                    .col(integer(CollectiveGenre::CollectiveId).not_null())
                    .col(integer(CollectiveGenre::GenreId).not_null())
                    .primary_key(
                        Index::create()
                            .col(CollectiveGenre::CollectiveId)
                            .col(CollectiveGenre::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collective_genre_collective")
                            .from(CollectiveGenre::Table, CollectiveGenre::CollectiveId)
                            .to(Collective::Table, Collective::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collective_genre_genre")
                            .from(CollectiveGenre::Table, CollectiveGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CollectiveGenre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CollectiveMember::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Collective::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Collective {
    Table,
    Id,
    Name,
    Slug,
    AdminId,
    Description,
    ProfileImage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CollectiveMember { Table, CollectiveId, ArtistProfileId }

#[derive(DeriveIden)]
enum CollectiveGenre { Table, CollectiveId, GenreId }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum ArtistProfile { Table, Id }

#[derive(DeriveIden)]
enum Genre { Table, Id }
