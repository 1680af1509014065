//! # school-core: Pure Domain Logic for School Desk
//!
//! Records, input contracts and rendering for the school back office, as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        School Desk Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Backend commands                             │   │
//! │  │    create_class_test, review_regularization, generate_receipt  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON in                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ school-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ contracts │  │   types   │  │   query   │  │  receipt  │  │   │
//! │  │   │ rule      │  │  records  │  │ ListFilter│  │  HTML     │  │   │
//! │  │   │ tables    │  │  🔒 checks│  │           │  │  rows     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    school-db (Database Layer)                   │   │
//! │  │        SQLite tables, existence checks, soft delete             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`validation`] - Rule tables (`Contract`, `Rule`) and the generic validator
//! - [`contracts`] - One contract + typed input per operation
//! - [`types`] - Persisted records and their immutable-field checks
//! - [`query`] - `ListFilter` for paged lists
//! - [`receipt`] - Fee receipt rendering
//! - [`money`] - Integer money (minor units)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use school_core::contracts::exam::CreateClassTest;
//! use school_core::validation::ValidatedInput;
//! use serde_json::json;
//!
//! let errors = CreateClassTest::parse(&json!({
//!     "subjectId": "6f9619ff-8b86-4d11-b42d-00c04fc964ff",
//!     "classId": "6f9619ff-8b86-4d11-b42d-00c04fc964ff",
//!     "date": "2024-08-12",
//!     "totalMark": 0,
//! }))
//! .unwrap_err();
//!
//! // Every failing field is reported, not just the first one
//! assert_eq!(errors.fields(), vec!["schoolId", "totalMark"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod contracts;
pub mod error;
pub mod money;
pub mod query;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use query::ListFilter;
pub use types::*;
pub use validation::{Contract, Rule, ValidatedInput};
