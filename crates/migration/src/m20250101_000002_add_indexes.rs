use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Genre: composite unique (name, line_id)
        manager
            .create_index(
                Index::create()
                    .name("uniq_genre_name_line")
                    .table(Genre::Table)
                    .col(Genre::Name)
                    .col(Genre::LineId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_genre_line")
                    .table(Genre::Table)
                    .col(Genre::LineId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_collective_admin")
                    .table(Collective::Table)
                    .col(Collective::AdminId)
                    .to_owned(),
            )
            .await?;

        // Galleries are always read per owner, ordered by position
        manager
            .create_index(
                Index::create()
                    .name("idx_artist_image_artist_position")
                    .table(ArtistImage::Table)
                    .col(ArtistImage::ArtistId)
                    .col(ArtistImage::Position)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_group_image_collective_position")
                    .table(GroupImage::Table)
                    .col(GroupImage::CollectiveId)
                    .col(GroupImage::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artist_social_artist")
                    .table(ArtistSocial::Table)
                    .col(ArtistSocial::ArtistId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_group_social_collective")
                    .table(GroupSocial::Table)
                    .col(GroupSocial::CollectiveId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_genre_name_line").table(Genre::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_genre_line").table(Genre::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_collective_admin").table(Collective::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_artist_image_artist_position").table(ArtistImage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_group_image_collective_position").table(GroupImage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_artist_social_artist").table(ArtistSocial::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_group_social_collective").table(GroupSocial::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Genre { Table, Name, LineId }

#[derive(DeriveIden)]
enum Collective { Table, AdminId }

#[derive(DeriveIden)]
enum ArtistImage { Table, ArtistId, Position }

#[derive(DeriveIden)]
enum GroupImage { Table, CollectiveId, Position }

#[derive(DeriveIden)]
enum ArtistSocial { Table, ArtistId }

#[derive(DeriveIden)]
enum GroupSocial { Table, CollectiveId }
