//! Admin registry: a fixed list binding each entity kind to the adapter
//! an admin UI uses to list, inspect, add, change and delete its rows.

mod entities;
mod forms;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use common::pagination::Pagination;

use crate::errors::ServiceError;

pub use entities::{
    ArtistImageAdmin, ArtistProfileAdmin, ArtistSocialAdmin, ArtisticLineAdmin, CollectiveAdmin, GenreAdmin,
    GroupImageAdmin, GroupSocialAdmin, UserAdmin,
};

/// One row as shown by the admin.
#[derive(Clone, Debug, Serialize)]
pub struct AdminRecord {
    pub id: i32,
    pub display: String,
    /// Serialized model; secrets such as password hashes are omitted.
    pub fields: Value,
}

impl AdminRecord {
    pub fn field(&self, name: &str) -> Option<&Value> { self.fields.get(name) }
}

/// Adapter for one entity kind. Writes go through the model operations,
/// so caps, slug generation and protect rules still apply.
#[async_trait]
pub trait AdminEntity: Send + Sync {
    /// URL-safe identifier, e.g. `"artist_profiles"`.
    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;
    /// Columns shown in list views.
    fn list_fields(&self) -> &'static [&'static str];
    async fn count(&self, db: &DatabaseConnection) -> Result<u64, ServiceError>;
    async fn list(&self, db: &DatabaseConnection, page: Pagination) -> Result<Vec<AdminRecord>, ServiceError>;
    async fn get(&self, db: &DatabaseConnection, id: i32) -> Result<Option<AdminRecord>, ServiceError>;
    /// Add a row from a submitted form object. Profiles and collectives
    /// accept `genre_ids`; collectives also accept `member_ids`.
    async fn create(&self, db: &DatabaseConnection, form: Value) -> Result<AdminRecord, ServiceError>;
    /// Change a row. Omitted id lists leave the associations as they are.
    async fn update(&self, db: &DatabaseConnection, id: i32, form: Value) -> Result<AdminRecord, ServiceError>;
    async fn delete(&self, db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError>;
}

#[derive(Clone, Debug, Serialize)]
pub struct EntitySummary {
    pub key: &'static str,
    pub label: &'static str,
    pub count: u64,
}

pub struct AdminSite {
    entries: &'static [&'static dyn AdminEntity],
}

impl AdminSite {
    pub const fn new(entries: &'static [&'static dyn AdminEntity]) -> Self { Self { entries } }

    pub fn entries(&self) -> &'static [&'static dyn AdminEntity] { self.entries }

    pub fn lookup(&self, key: &str) -> Option<&'static dyn AdminEntity> {
        self.entries.iter().copied().find(|e| e.key() == key)
    }

    /// Like [`lookup`](Self::lookup), failing with `UnknownEntity`.
    pub fn require(&self, key: &str) -> Result<&'static dyn AdminEntity, ServiceError> {
        self.lookup(key).ok_or_else(|| ServiceError::UnknownEntity(key.to_string()))
    }

    /// Row count per registered entity, in registration order.
    #[instrument(skip(self, db))]
    pub async fn summary(&self, db: &DatabaseConnection) -> Result<Vec<EntitySummary>, ServiceError> {
        let mut out = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            out.push(EntitySummary { key: entry.key(), label: entry.label(), count: entry.count(db).await? });
        }
        Ok(out)
    }

    pub async fn create(&self, db: &DatabaseConnection, key: &str, form: Value) -> Result<AdminRecord, ServiceError> {
        let record = self.require(key)?.create(db, form).await?;
        info!(event = "admin_create", entity = key, id = record.id, "admin added record");
        Ok(record)
    }

    pub async fn update(&self, db: &DatabaseConnection, key: &str, id: i32, form: Value) -> Result<AdminRecord, ServiceError> {
        let record = self.require(key)?.update(db, id, form).await?;
        info!(event = "admin_update", entity = key, id, "admin changed record");
        Ok(record)
    }

    pub async fn delete(&self, db: &DatabaseConnection, key: &str, id: i32) -> Result<bool, ServiceError> {
        let deleted = self.require(key)?.delete(db, id).await?;
        if deleted {
            info!(event = "admin_delete", entity = key, id, "admin deleted record");
        }
        Ok(deleted)
    }
}

pub static ADMIN_SITE: AdminSite = AdminSite::new(&[
    &UserAdmin,
    &ArtisticLineAdmin,
    &GenreAdmin,
    &ArtistProfileAdmin,
    &CollectiveAdmin,
    &ArtistImageAdmin,
    &GroupImageAdmin,
    &ArtistSocialAdmin,
    &GroupSocialAdmin,
]);

#[cfg(test)]
mod tests;
