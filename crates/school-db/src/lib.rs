//! # school-db: Database Layer for School Desk
//!
//! SQLite storage for schools, attendance regularizations, classes, class
//! tests, semester exams and expenses, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        School Desk Data Flow                            │
//! │                                                                         │
//! │  Backend command (create_class_test)                                   │
//! │       │  validated input from school-core                              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    school-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ SchoolRepo     │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ClassTestRepo  │   │ 001_initial  │  │   │
//! │  │   │ WAL mode      │    │ SemExamRepo    │   │ _schema.sql  │  │   │
//! │  │   │               │    │ ExpenseRepo ...│   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (platform data dir)/school.db                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Rules Enforced Here
//! - `schoolId` on class tests and semester exams must name an active
//!   school before the row is inserted ([`DbError::ReferenceNotFound`])
//! - Immutable fields are checked on the loaded record before any write
//!   ([`DbError::Domain`])
//! - Deletes are soft: `is_active = 0`; lists only return active rows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use school_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/school.db")).await?;
//!
//! let test = db.class_tests().insert(input).await?;
//! let page = db.class_tests().list(ListFilter::new(1, 20)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::class::ClassRepository;
pub use repository::class_test::ClassTestRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::regularization::RegularizationRepository;
pub use repository::school::SchoolRepository;
pub use repository::sem_exam::SemExamRepository;
