//! Domain error types shared by services and stores.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => DomainError::Conflict("Resource already exists".into()),
                Some("23503") => DomainError::NotFound("Referenced resource not found".into()),
                _ => DomainError::Storage(format!("Database error: {}", db_err)),
            },
            _ => DomainError::Storage(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationError> for DomainError {
    fn from(err: validator::ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        DomainError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DomainError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_storage() {
        let err: DomainError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[test]
    fn test_validation_error_uses_message() {
        let err: DomainError = shared::validation::validate_points(0).unwrap_err().into();
        match err {
            DomainError::Validation(msg) => assert_eq!(msg, "Points must not be zero"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DomainError::NotFound("user".into()).to_string(),
            "Not found: user"
        );
        assert_eq!(
            DomainError::Storage("down".into()).to_string(),
            "Storage error: down"
        );
    }
}
