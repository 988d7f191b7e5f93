//! # Persistence Errors
//!
//! Error types for the persistence layer, wrapping sqlx errors while
//! keeping constraint violations distinguishable from generic failures.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// The compare-and-swap predicate of a guarded update matched no row;
    /// the caller re-reads and retries.
    #[error("Concurrent update conflict on {entity} with id {id}")]
    UpdateConflict { entity: String, id: String },

    // === Conversion errors ===
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("Invalid enum value: {field} = {value}")]
    InvalidEnumValue { field: String, value: String },
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn update_conflict(entity: &str, id: impl ToString) -> Self {
        Self::UpdateConflict {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    pub fn is_update_conflict(&self) -> bool {
        matches!(self, Self::UpdateConflict { .. })
    }
}

impl From<sqlx::Error> for PersistenceError {
    /// Classifies constraint violations so callers can translate them into
    /// specific taxonomy members instead of a generic failure.
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            match db_error.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return Self::UniqueViolation(db_error.message().to_string());
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return Self::ForeignKeyViolation(db_error.message().to_string());
                }
                _ => {}
            }
        }

        Self::Database(error)
    }
}
