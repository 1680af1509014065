//! # API Error Type
//!
//! Unified error type for backend commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in School Desk                            │
//! │                                                                         │
//! │  Command Function → Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Contract failed? ──── ValidationErrors ──────────┐                     │
//! │         │                                         │                     │
//! │         ▼                                         │                     │
//! │  Immutable field? ──── CoreError::ImmutableField ─┤                     │
//! │         │                                         │                     │
//! │         ▼                                         ▼                     │
//! │  Store failed? ─────── DbError ────────────────► ApiError ──► caller   │
//! │         │                                         ▲                     │
//! │         ▼                                         │                     │
//! │  Template missing? ─── AssetError ────────────────┘                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ──────────────────────────────────────────────────► caller    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal causes (SQL text, file paths) are logged and replaced by a
//! generic message; the caller only sees `code`, `message` and, for
//! validation failures, the per-field `details`.

use serde::Serialize;
use school_core::{CoreError, ValidationErrors};
use school_db::DbError;

use crate::assets::AssetError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Validation failed",
///   "details": [{ "field": "totalMark", "message": "totalMark must not be less than 1" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// One entry per offending field (validation errors only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

/// One failed field of a rejected input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// A referenced record does not exist (422)
    ReferenceNotFound,

    /// Update tried to change a fixed field (422)
    ImmutableField,

    /// Store, template or asset unreachable (503)
    ResourceUnavailable,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a resource unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ResourceUnavailable, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts contract failures to API errors, keeping every field.
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let details = errors
            .iter()
            .map(|e| FieldError {
                field: e.field().to_string(),
                message: e.to_string(),
            })
            .collect();

        ApiError {
            code: ErrorCode::ValidationError,
            message: "Validation failed".to_string(),
            details,
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => errors.into(),
            CoreError::ImmutableField { .. } => {
                ApiError::new(ErrorCode::ImmutableField, err.to_string())
            }
            CoreError::AmountOverflow { .. } => {
                ApiError::new(ErrorCode::ValidationError, err.to_string())
            }
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ReferenceNotFound { .. } => {
                ApiError::new(ErrorCode::ReferenceNotFound, err.to_string())
            }
            DbError::Domain(core) => core.into(),
            DbError::ConstraintViolation(check) => {
                tracing::warn!("Constraint rejected write: {}", check);
                ApiError::new(ErrorCode::ValidationError, "Value is out of the allowed range")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::unavailable("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::unavailable("Database migration failed")
            }
            DbError::PoolExhausted => ApiError::unavailable("Database pool exhausted"),
            DbError::CorruptColumn { column, message } => {
                tracing::error!(column = %column, "Corrupt stored value: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Stored record could not be read")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Database operation failed")
            }
        }
    }
}

/// Converts asset errors to API errors.
impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        tracing::error!("Asset unavailable: {}", err);
        ApiError::unavailable("Receipt template is unavailable")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use school_core::ValidationError;
    use serde_json::json;

    #[test]
    fn test_validation_details_serialize() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::required("schoolId"));
        errors.push(ValidationError::invalid_format("date", "expected YYYY-MM-DD"));

        let api: ApiError = CoreError::Validation(errors).into();
        let value = serde_json::to_value(&api).unwrap();

        assert_eq!(value["code"], "VALIDATION_ERROR");
        assert_eq!(value["details"][0], json!({ "field": "schoolId", "message": "schoolId is required" }));
        assert_eq!(value["details"][1]["field"], "date");
    }

    #[test]
    fn test_db_errors_map_to_codes() {
        let api: ApiError = DbError::missing_reference("ClassTest", "schoolId", "x").into();
        assert_eq!(api.code, ErrorCode::ReferenceNotFound);

        let api: ApiError = DbError::from(CoreError::immutable("ClassTest", "classId")).into();
        assert_eq!(api.code, ErrorCode::ImmutableField);
        assert_eq!(api.message, "ClassTest.classId cannot be changed after creation");

        let api: ApiError = DbError::not_found("Expense", "e1").into();
        assert_eq!(api.code, ErrorCode::NotFound);

        let api: ApiError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(api.code, ErrorCode::DatabaseError);
        assert!(!api.message.contains("SELEC"));

        let api: ApiError = DbError::PoolExhausted.into();
        assert_eq!(api.code, ErrorCode::ResourceUnavailable);

        let api: ApiError = CoreError::overflow("Receipt total").into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.message, "Receipt total is too large");
    }

    #[test]
    fn test_non_validation_errors_omit_details() {
        let value = serde_json::to_value(ApiError::not_found("School", "s1")).unwrap();
        assert!(value.get("details").is_none());
        assert_eq!(value["message"], "School not found: s1");
    }
}
