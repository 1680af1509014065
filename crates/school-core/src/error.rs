//! # Error Types
//!
//! Domain-specific error types for school-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  school-core errors (this file)                                        │
//! │  ├── CoreError         - Domain rule violations                        │
//! │  ├── ValidationErrors  - Every failed field of one input               │
//! │  └── ValidationError   - One failed field                              │
//! │                                                                         │
//! │  school-db errors (separate crate)                                     │
//! │  └── DbError           - Store failures, missing references            │
//! │                                                                         │
//! │  backend errors (in app)                                               │
//! │  └── ApiError          - What the caller sees (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors → CoreError → ApiError       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every validation failure names its field
//! 3. Errors are enum variants, never String
//! 4. Validation reports the whole sweep, not just the first failure

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected by its contract.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// An update tried to change a field that is fixed after creation.
    ///
    /// ## When This Occurs
    /// - Moving a class test to another class or school
    /// - Moving a semester exam to another class or school
    /// - Switching a regularization between full day and half day
    ///
    /// The whole update is rejected; no other field of it is applied.
    #[error("{entity}.{field} cannot be changed after creation")]
    ImmutableField { entity: String, field: String },

    /// A computed amount (line total, receipt total, net pay) does not fit
    /// in `i64` minor units.
    #[error("{what} is too large")]
    AmountOverflow { what: String },
}

impl CoreError {
    /// Creates an ImmutableField error.
    pub fn immutable(entity: impl Into<String>, field: impl Into<String>) -> Self {
        CoreError::ImmutableField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Creates an AmountOverflow error.
    pub fn overflow(what: impl Into<String>) -> Self {
        CoreError::AmountOverflow { what: what.into() }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field that failed its rule.
///
/// Field names are the wire names (`schoolId`, `exams[1].startTime`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing, null or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field holds the wrong JSON type.
    #[error("{field} must be {expected}")]
    InvalidType { field: String, expected: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below the minimum.
    #[error("{field} must not be less than {min}")]
    TooSmall { field: String, min: f64 },

    /// Numeric value is above the maximum.
    #[error("{field} must not be greater than {max}")]
    TooLarge { field: String, max: f64 },

    /// Invalid format (e.g., invalid UUID, invalid date, bad email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A list that must hold at least one element is empty.
    #[error("{field} must contain at least one element")]
    EmptyList { field: String },

    /// Input carries a key the contract does not declare.
    #[error("{field} is not an accepted field")]
    UnknownField { field: String },

    /// A custom predicate failed.
    #[error("{field} {message}")]
    Custom { field: String, message: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidType { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::TooSmall { field, .. }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::EmptyList { field }
            | ValidationError::UnknownField { field }
            | ValidationError::Custom { field, .. } => field,
        }
    }

    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Errors (collection)
// =============================================================================

/// Every field failure found while validating one input.
///
/// Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        ValidationErrors::default()
    }

    /// Adds a failure.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Appends all failures of another collection.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Names of the offending fields, in sweep order.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(ValidationError::field).collect()
    }

    /// Checks whether any failure names the given field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// Returns `Ok(value)` when empty, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for CoreError {
    fn from(error: ValidationError) -> Self {
        CoreError::Validation(error.into())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
