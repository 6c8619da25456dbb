use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown admin entity: {0}")]
    UnknownEntity(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self { Self::Serialization(err.to_string()) }
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Model(ModelError::Validation(_)) => 1001,
            ServiceError::Model(ModelError::Uniqueness(_)) => 1002,
            ServiceError::Model(ModelError::ReferentialIntegrity(_)) => 1003,
            ServiceError::Model(ModelError::NotFound(_)) => 1004,
            ServiceError::UnknownEntity(_) => 1005,
            ServiceError::Model(ModelError::Hash(_)) => 1101,
            ServiceError::Serialization(_) => 1102,
            ServiceError::Model(ModelError::Db(_)) => 1200,
        }
    }

    /// Message fit for a form error next to the offending input. Storage
    /// details stay in the logs.
    pub fn form_message(&self) -> String {
        match self {
            ServiceError::Model(ModelError::Validation(msg)) => msg.clone(),
            ServiceError::Model(ModelError::Uniqueness(_)) => "A record with these values already exists.".into(),
            ServiceError::Model(ModelError::ReferentialIntegrity(_)) => {
                "This record is still referenced by other records and cannot be deleted.".into()
            }
            ServiceError::Model(ModelError::NotFound(msg)) => msg.clone(),
            ServiceError::UnknownEntity(key) => format!("No admin section named '{key}'."),
            ServiceError::Model(ModelError::Hash(_))
            | ServiceError::Model(ModelError::Db(_))
            | ServiceError::Serialization(_) => "Unexpected error, please try again.".into(),
        }
    }

    pub fn is_validation(&self) -> bool { matches!(self, ServiceError::Model(ModelError::Validation(_))) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_kind() {
        let errs = [
            ServiceError::from(ModelError::Validation("x".into())),
            ServiceError::from(ModelError::Uniqueness("x".into())),
            ServiceError::from(ModelError::ReferentialIntegrity("x".into())),
            ServiceError::from(ModelError::NotFound("x".into())),
            ServiceError::UnknownEntity("x".into()),
            ServiceError::from(ModelError::Db("x".into())),
        ];
        let mut codes: Vec<u16> = errs.iter().map(ServiceError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn form_message_hides_storage_details() {
        let err = ServiceError::from(ModelError::Uniqueness("UNIQUE constraint failed: user.email".into()));
        assert!(!err.form_message().contains("constraint"));
        let err = ServiceError::from(ModelError::Validation("maximum 5 images: collective already has 5".into()));
        assert_eq!(err.form_message(), "maximum 5 images: collective already has 5");
        assert!(err.is_validation());
    }
}
