//! Create `artist_profile` (one per user) and its genre association table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArtistProfile::Table)
                    .if_not_exists()
                    .col(pk_auto(ArtistProfile::Id))
                    .col(integer(ArtistProfile::UserId).unique_key().not_null())
                    .col(ColumnDef::new(ArtistProfile::StageName).string_len(150).null())
                    .col(ColumnDef::new(ArtistProfile::Description).text().null())
                    .col(ColumnDef::new(ArtistProfile::ProfileImage).string_len(255).null())
                    .col(timestamp_with_time_zone(ArtistProfile::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ArtistProfile::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_profile_user")
                            .from(ArtistProfile::Table, ArtistProfile::UserId)
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
                    .table(ArtistProfileGenre::Table)
                    .if_not_exists()
                    .col(integer(ArtistProfileGenre::ArtistProfileId).not_null())
                    .col(integer(ArtistProfileGenre::GenreId).not_null())
                    .primary_key(
                        Index::create()
                            .col(ArtistProfileGenre::ArtistProfileId)
                            .col(ArtistProfileGenre::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_profile_genre_profile")
                            .from(ArtistProfileGenre::Table, ArtistProfileGenre::ArtistProfileId)
                            .to(ArtistProfile::Table, ArtistProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artist_profile_genre_genre")
                            .from(ArtistProfileGenre::Table, ArtistProfileGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ArtistProfileGenre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ArtistProfile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ArtistProfile {
    Table,
    Id,
    UserId,
    StageName,
    Description,
    ProfileImage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ArtistProfileGenre { Table, ArtistProfileId, GenreId }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Genre { Table, Id }
