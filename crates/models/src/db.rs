use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::debug;

use migration::MigratorTrait;

pub use configs::DatabaseConfig;

/// Connect with explicit pool settings.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(cfg.connect_timeout())
        .idle_timeout(cfg.idle_timeout())
        .max_lifetime(cfg.max_lifetime())
        .acquire_timeout(cfg.acquire_timeout())
        .sqlx_logging(cfg.sqlx_logging);
    debug!(max = cfg.max_connections, min = cfg.min_connections, "connecting database pool");
    let db = Database::connect(opt).await?;
    Ok(db)
}

/// Apply every pending migration.
pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
    migration::Migrator::up(db, None).await?;
    Ok(())
}

/// Fresh in-memory SQLite database with every migration applied.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let db = connect_with_config(&DatabaseConfig::sqlite_in_memory()).await?;
    migrate(&db).await?;
    Ok(db)
}
