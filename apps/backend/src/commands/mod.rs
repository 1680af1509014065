//! # Commands Module
//!
//! Every operation the backend exposes, one module per resource.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (accept + exports)
//! ├── school.rs         ◄─── Schools
//! ├── regularization.rs ◄─── Attendance corrections + review
//! ├── class.rs          ◄─── Classes
//! ├── class_test.rs     ◄─── Class tests
//! ├── sem_exam.rs       ◄─── Semester exams
//! ├── expense.rs        ◄─── Expenses
//! └── receipt.rs        ◄─── HTML receipts
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Caller (HTTP adapter, CLI, test)                                       │
//! │  ─────────────────────────────────                                      │
//! │  let body = json!({ "schoolId": "...", "totalMark": 25, ... });         │
//! │  commands::class_test::create_class_test(&db, &body).await              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  pub async fn create_class_test(                                        │
//! │      db: &Database,      ◄── Shared handle                              │
//! │      body: &Value,       ◄── Untrusted JSON                             │
//! │  ) -> Result<ClassTest, ApiError>                                       │
//! │         │                                                               │
//! │         │ (records serialize as camelCase JSON)                         │
//! │         ▼                                                               │
//! │  Caller receives: ClassTest                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Attendance, employee, payroll, student and user payloads have no store
//! in this backend; callers run them through [`accept`] directly.

pub mod class;
pub mod expense;
pub mod receipt;
pub mod regularization;
pub mod school;
pub mod sem_exam;

use school_core::ValidatedInput;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

/// Runs `body` through the contract of `T` and returns the typed input.
///
/// ## Example
/// ```rust,ignore
/// let payroll: CreatePayroll = accept(&body)?;
/// let net = payroll.net_salary()?;
/// ```
pub fn accept<T: ValidatedInput>(body: &Value) -> Result<T, ApiError> {
    T::parse(body).map_err(|errors| {
        debug!(
            contract = T::contract().name(),
            fields = ?errors.fields(),
            "Input rejected"
        );
        ApiError::from(errors)
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use school_db::{Database, DbConfig};
    use serde_json::{json, Value};

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn school_body() -> Value {
        json!({
            "name": "Green Valley High",
            "address": "12 Hill Road, Pune",
            "phone": "+919876543210",
            "email": "office@greenvalley.edu",
            "logo": "https://greenvalley.edu/logo.png"
        })
    }

    pub fn uuid() -> String {
        school_core::types::new_id()
    }
}
