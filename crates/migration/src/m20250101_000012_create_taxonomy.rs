//! Create `artistic_line` and `genre`.
//!
//! Genres are protected: a line cannot be dropped while a genre points at it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArtisticLine::Table)
                    .if_not_exists()
                    .col(pk_auto(ArtisticLine::Id))
                    .col(string_len(ArtisticLine::Name, 100).unique_key().not_null())
                    .col(ColumnDef::new(ArtisticLine::Description).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(pk_auto(Genre::Id))
                    .col(string_len(Genre::Name, 100).not_null())
                    .col(integer(Genre::LineId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_genre_line")
                            .from(Genre::Table, Genre::LineId)
                            .to(ArtisticLine::Table, ArtisticLine::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ArtisticLine::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ArtisticLine { Table, Id, Name, Description }

#[derive(DeriveIden)]
enum Genre { Table, Id, Name, LineId }
