//! Owner row locking for check-then-write invariants.
//!
//! Count limits (images per owner, genres per owner) are evaluated inside a
//! transaction after locking the owner row, so concurrent writers for the
//! same owner are serialized. Postgres gets `SELECT ... FOR UPDATE`; SQLite
//! already serializes writers per database.

use sea_orm::{ConnectionTrait, DbBackend, EntityTrait, PrimaryKeyTrait, QuerySelect};

use crate::errors::ModelError;

pub async fn lock_owner<E, C>(conn: &C, id: i32, label: &str) -> Result<E::Model, ModelError>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    C: ConnectionTrait,
{
    let mut query = E::find_by_id(id);
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(conn).await?.ok_or_else(|| ModelError::not_found(label))
}
