//! # Repository Module
//!
//! One repository per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Backend command                                                       │
//! │       │                                                                 │
//! │       │  db.class_tests().insert(input)                                │
//! │       ▼                                                                 │
//! │  ClassTestRepository                                                   │
//! │  ├── insert(&self, input)          schoolId existence check first      │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list(&self, filter)           active rows, newest first           │
//! │  ├── update(&self, id, changes)    immutable fields checked            │
//! │  ├── soft_delete(&self, id)        is_active = 0                       │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SchoolRepository`](school::SchoolRepository) - Schools, `exists` lookups
//! - [`RegularizationRepository`](regularization::RegularizationRepository) - Attendance corrections + review
//! - [`ClassRepository`](class::ClassRepository) - Classes with subject sets
//! - [`ClassTestRepository`](class_test::ClassTestRepository) - Class tests (school-checked)
//! - [`SemExamRepository`](sem_exam::SemExamRepository) - Semester exams (school-checked)
//! - [`ExpenseRepository`](expense::ExpenseRepository) - School expenses
//!
//! Soft-deleted rows stay readable through `get_by_id` but are closed to
//! writes: `update`, `review` and `soft_delete` return `NotFound` for them.

pub mod class;
pub mod expense;
pub mod regularization;
pub mod school;
pub mod sem_exam;

use school_core::ListFilter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Executor, Sqlite};

use crate::error::{DbError, DbResult};

/// True when an active school with this id exists.
///
/// Generic over the executor so write paths can run it inside their
/// transaction.
pub(crate) async fn school_exists<'e, E>(executor: E, id: &str) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM schools WHERE id = ?1 AND is_active = 1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
    Ok(found.is_some())
}

/// `(LIMIT, OFFSET)` for a list query.
pub(crate) fn page_bounds(filter: &ListFilter, default_limit: u32) -> (i64, i64) {
    let limit = i64::from(filter.limit_or(default_limit));
    let offset = i64::try_from(filter.offset(default_limit)).unwrap_or(i64::MAX);
    (limit, offset)
}

/// Serializes a value for a JSON TEXT column.
pub(crate) fn encode_json<T: Serialize>(column: &str, value: &T) -> DbResult<String> {
    serde_json::to_string(value).map_err(|e| DbError::corrupt(column, e))
}

/// Reads a JSON TEXT column.
pub(crate) fn decode_json<T: DeserializeOwned>(column: &str, text: &str) -> DbResult<T> {
    serde_json::from_str(text).map_err(|e| DbError::corrupt(column, e))
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use school_core::contracts::school::CreateSchool;
    use school_core::School;

    use crate::pool::{Database, DbConfig};

    pub(crate) const MISSING: &str = "00000000-0000-4000-8000-00000000dead";

    pub(crate) async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub(crate) async fn school(db: &Database) -> School {
        db.schools()
            .insert(CreateSchool {
                name: "Green Valley High".into(),
                address: "12 Hill Road".into(),
                phone: "+919876543210".into(),
                email: "office@greenvalley.edu".into(),
                logo: None,
            })
            .await
            .unwrap()
    }

    pub(crate) fn id() -> String {
        school_core::types::new_id()
    }
}
