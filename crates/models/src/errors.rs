use sea_orm::{DbErr, SqlErr, TransactionError};
use thiserror::Error;

/// Marker prefixed to `DbErr::Custom` messages raised from save hooks so
/// they surface as [`ModelError::Validation`] again.
const VALIDATION_MARKER: &str = "validation: ";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("uniqueness violation: {0}")]
    Uniqueness(String),
    #[error("referential integrity violation: {0}")]
    ReferentialIntegrity(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("password hashing error: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }
    pub fn is_uniqueness(&self) -> bool { matches!(self, Self::Uniqueness(_)) }
}

impl From<DbErr> for ModelError {
    fn from(err: DbErr) -> Self {
        if let DbErr::Custom(msg) = &err {
            if let Some(rest) = msg.strip_prefix(VALIDATION_MARKER) {
                return ModelError::Validation(rest.to_string());
            }
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::Uniqueness(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ModelError::ReferentialIntegrity(msg),
            _ => ModelError::Db(err.to_string()),
        }
    }
}

impl From<TransactionError<ModelError>> for ModelError {
    fn from(err: TransactionError<ModelError>) -> Self {
        match err {
            TransactionError::Connection(db) => db.into(),
            TransactionError::Transaction(inner) => inner,
        }
    }
}

/// Turn a model-level rejection into a `DbErr` that survives the trip
/// through `ActiveModelBehavior::before_save`.
pub(crate) fn hook_rejection(err: ModelError) -> DbErr {
    match err {
        ModelError::Validation(msg) => DbErr::Custom(format!("{VALIDATION_MARKER}{msg}")),
        other => DbErr::Custom(other.to_string()),
    }
}
