//! Store error type shared by the access layer and the request handlers.

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = StoreError::not_found("venue", 42);
        assert_eq!(err.to_string(), "venue 42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_missing_field() {
        let err = StoreError::MissingField("name");
        assert_eq!(err.to_string(), "missing field: name");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_display_invalid_field() {
        let err = StoreError::invalid("venue_id", "abc");
        assert_eq!(err.to_string(), "invalid value for venue_id: \"abc\"");
    }

    #[test]
    fn test_from_db_err() {
        let err: StoreError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, StoreError::Database(_)));
        assert!(err.to_string().starts_with("database error:"));
    }
}
