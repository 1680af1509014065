//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      Domain rule (CoreError)               │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in backend) ← Serialized for the caller                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use school_core::CoreError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - ID doesn't exist
    /// - Soft-deleted record on a write path
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A reference that must exist at write time does not.
    ///
    /// ## When This Occurs
    /// - Class test or semester exam created with an unknown `schoolId`
    ///
    /// Nothing is written when this is returned.
    #[error("{entity}.{field} references a missing record: {id}")]
    ReferenceNotFound {
        entity: String,
        field: String,
        id: String,
    },

    /// A domain rule rejected the write (immutable field, bad input).
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A CHECK constraint rejected the row (e.g. negative amount).
    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    /// Stored JSON column could not be read or written.
    #[error("Corrupt {column} column: {message}")]
    CorruptColumn { column: String, message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a ReferenceNotFound error.
    pub fn missing_reference(
        entity: impl Into<String>,
        field: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        DbError::ReferenceNotFound {
            entity: entity.into(),
            field: field.into(),
            id: id.into(),
        }
    }

    pub(crate) fn corrupt(column: &str, err: serde_json::Error) -> Self {
        DbError::CorruptColumn {
            column: column.to_string(),
            message: err.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports these as "CHECK constraint failed: <expr>"
                if let Some(check) = msg.split("CHECK constraint failed: ").nth(1) {
                    DbError::ConstraintViolation(check.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DbError::missing_reference("ClassTest", "schoolId", "abc");
        assert_eq!(err.to_string(), "ClassTest.schoolId references a missing record: abc");

        let err: DbError = CoreError::immutable("SemExam", "classId").into();
        assert_eq!(err.to_string(), "SemExam.classId cannot be changed after creation");
    }
}
