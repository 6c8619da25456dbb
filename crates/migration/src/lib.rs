//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000011_create_user;
mod m20250101_000012_create_taxonomy;
mod m20250101_000013_create_artist_profile;
mod m20250101_000014_create_collective;
mod m20250101_000015_create_gallery;
mod m20250101_000016_create_social;
mod m20250101_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000011_create_user::Migration),
            Box::new(m20250101_000012_create_taxonomy::Migration),
            Box::new(m20250101_000013_create_artist_profile::Migration),
            Box::new(m20250101_000014_create_collective::Migration),
            Box::new(m20250101_000015_create_gallery::Migration),
            Box::new(m20250101_000016_create_social::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000002_add_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database};

    #[tokio::test]
    async fn migrations_apply_and_revert_on_sqlite() {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt).await.expect("connect sqlite");

        Migrator::up(&db, None).await.expect("migrate up");
        let manager = SchemaManager::new(&db);
        for table in [
            "user",
            "artistic_line",
            "genre",
            "artist_profile",
            "artist_profile_genre",
            "collective",
            "collective_member",
            "collective_genre",
            "artist_image",
            "group_image",
            "artist_social",
            "group_social",
        ] {
            assert!(manager.has_table(table).await.expect("has_table"), "missing table {table}");
        }

        Migrator::down(&db, None).await.expect("migrate down");
        assert!(!manager.has_table("collective").await.expect("has_table"));
    }
}
