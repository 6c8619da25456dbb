//! Runtime bootstrap shared by binaries.

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use configs::DatabaseConfig;

/// Validate the database settings, connect and bring the schema up to date.
pub async fn bootstrap(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    cfg.validate()?;
    let db = models::db::connect_with_config(cfg).await?;
    models::db::migrate(&db).await?;
    info!(
        event = "db_ready",
        backend = ?db.get_database_backend(),
        max_connections = cfg.max_connections,
        "database connected and migrated"
    );
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::ADMIN_SITE;

    #[tokio::test]
    async fn bootstrap_in_memory_yields_empty_directory() -> anyhow::Result<()> {
        let db = bootstrap(&DatabaseConfig::sqlite_in_memory()).await?;
        let summary = ADMIN_SITE.summary(&db).await?;
        assert_eq!(summary.len(), 9);
        assert!(summary.iter().all(|s| s.count == 0));
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_rejects_bad_url() {
        let cfg = DatabaseConfig { url: "mysql://localhost/db".into(), ..DatabaseConfig::sqlite_in_memory() };
        assert!(bootstrap(&cfg).await.is_err());
    }
}
