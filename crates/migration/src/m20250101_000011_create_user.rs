//! Create `user` table.
//!
//! Username and email are both globally unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Username, 150).unique_key().not_null())
                    .col(string_len(User::Email, 254).unique_key().not_null())
                    .col(string_len(User::Password, 128).not_null())
                    .col(string_len(User::FirstName, 150).not_null())
                    .col(string_len(User::LastName, 150).not_null())
                    .col(boolean(User::IsStaff).default(false))
                    .col(boolean(User::IsActive).default(true))
                    .col(boolean(User::IsSuperuser).default(false))
                    .col(
                        ColumnDef::new(User::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(User::DateJoined).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    Email,
    Password,
    FirstName,
    LastName,
    IsStaff,
    IsActive,
    IsSuperuser,
    LastLogin,
    DateJoined,
}
