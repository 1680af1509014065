//! # Input Contracts
//!
//! One rule table per mutating operation, plus the typed input it
//! deserializes into.
//!
//! ## Contract Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Resource        Create contract          Update contract              │
//! │  ─────────────   ──────────────────────   ───────────────────────────  │
//! │  school          CreateSchool             partial()                    │
//! │  attendance      MarkAttendance           partial()                    │
//! │  regularization  CreateRegularization     UpdateRegularization, Review │
//! │  employee        CreateEmployee           partial()                    │
//! │  payroll         CreatePayroll            partial()                    │
//! │  class           CreateClass              partial()                    │
//! │  class test      CreateClassTest          partial()                    │
//! │  sem exam        CreateSemExam            partial()                    │
//! │  expense         CreateExpense            partial() + updatedBy        │
//! │  student         CreateStudent            partial()                    │
//! │  user            CreateUser, Login        partial()                    │
//! │  receipt         GenerateReceipt          -                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Update contracts are derived with
//! [`Contract::partial`](crate::validation::Contract::partial), so a rule
//! change on the create side carries over.

pub mod attendance;
pub mod class;
pub mod employee;
pub mod exam;
pub mod expense;
pub mod payroll;
pub mod receipt;
pub mod school;
pub mod student;
pub mod user;

use crate::validation::Rule;

// =============================================================================
// Shared Rule Lists
// =============================================================================

/// Record identifier.
pub(crate) fn id() -> Vec<Rule> {
    vec![Rule::IsString, Rule::Identifier]
}

/// Non-blank text up to `max` characters.
pub(crate) fn text(max: usize) -> Vec<Rule> {
    vec![Rule::IsString, Rule::NotEmpty, Rule::MaxLength(max)]
}

/// Calendar date.
pub(crate) fn date() -> Vec<Rule> {
    vec![Rule::IsString, Rule::IsDate]
}

/// Largest single amount accepted on the wire, in major units.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Largest quantity of one receipt item.
pub const MAX_QUANTITY: f64 = 10_000.0;

/// Non-negative amount in major units with at most two decimals.
pub(crate) fn amount() -> Vec<Rule> {
    vec![Rule::IsNumber, Rule::Min(0.0), Rule::Max(MAX_AMOUNT), Rule::MaxDecimals(2)]
}

pub(crate) fn flag() -> Vec<Rule> {
    vec![Rule::IsBoolean]
}

pub(crate) fn one_of(allowed: &'static [&'static str]) -> Vec<Rule> {
    vec![Rule::IsString, Rule::OneOf(allowed)]
}
