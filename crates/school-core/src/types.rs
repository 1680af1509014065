//! # Domain Types
//!
//! Persisted records and the enums shared by contracts and records.
//!
//! ## Record Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Records                                  │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐   ┌─────────────────┐  │
//! │  │     School      │◄───────│    ClassTest    │   │     Class       │  │
//! │  │  ─────────────  │ exists │  ─────────────  │   │  ─────────────  │  │
//! │  │  name, address  │ check  │  schoolId  🔒   │   │  schoolId       │  │
//! │  │  phone, email   │        │  classId   🔒   │   │  classTeacherId │  │
//! │  │  logo           │◄──┐    │  subjectId      │   │  subjects[1..]  │  │
//! │  └─────────────────┘   │    └─────────────────┘   └─────────────────┘  │
//! │                        │                                                │
//! │  ┌─────────────────┐   │    ┌─────────────────┐   ┌─────────────────┐  │
//! │  │    SemExam      │───┘    │  Regularization │   │    Expense      │  │
//! │  │  ─────────────  │        │  ─────────────  │   │  ─────────────  │  │
//! │  │  schoolId  🔒   │        │  status=pending │   │  amount ≥ 0     │  │
//! │  │  classId   🔒   │        │  type      🔒   │   │  createdBy      │  │
//! │  │  exams[] (owned)│        │  reviewedAt     │   │  updatedBy      │  │
//! │  └─────────────────┘        └─────────────────┘   └─────────────────┘  │
//! │                                                                         │
//! │  🔒 = immutable after creation                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity and Lifecycle
//! - `id`: UUID v4, generated when the record is built from its create input
//! - References are plain identifiers; only `schoolId` on class tests and
//!   semester exams is existence-checked (in school-db)
//! - `is_active = false` is a soft delete; rows are never removed

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::contracts::attendance::{CreateRegularization, UpdateRegularization};
use crate::contracts::class::{CreateClass, UpdateClass};
use crate::contracts::exam::{CreateClassTest, CreateSemExam, ExamEntryInput, UpdateClassTest, UpdateSemExam};
use crate::contracts::expense::{CreateExpense, UpdateExpense};
use crate::contracts::school::{CreateSchool, UpdateSchool};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Generates a new record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Rejects a change to a field fixed at creation.
///
/// Supplying the stored value again is not a change.
fn ensure_unchanged<T: PartialEq>(
    entity: &str,
    field: &str,
    current: &T,
    requested: Option<&T>,
) -> CoreResult<()> {
    match requested {
        Some(value) if value != current => Err(CoreError::immutable(entity, field)),
        _ => Ok(()),
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Review state of an attendance regularization request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "camelCase"))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum RegularizationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RegularizationStatus {
    pub const VALUES: &'static [&'static str] = &["pending", "approved", "rejected"];
}

/// Whether a regularization covers the full day or half of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "camelCase"))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum RegularizationType {
    FullDay,
    HalfDay,
}

impl RegularizationType {
    pub const VALUES: &'static [&'static str] = &["fullDay", "halfDay"];
}

/// Daily attendance mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
}

impl AttendanceStatus {
    pub const VALUES: &'static [&'static str] = &["present", "absent", "late", "leave"];
}

/// Staff roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum EmployeeRole {
    Admin,
    Teacher,
    Accountant,
    Librarian,
    Staff,
}

impl EmployeeRole {
    pub const VALUES: &'static [&'static str] = &["admin", "teacher", "accountant", "librarian", "staff"];
}

/// Account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Teacher,
    Student,
    Parent,
}

impl UserRole {
    pub const VALUES: &'static [&'static str] = &["superAdmin", "admin", "teacher", "student", "parent"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMode {
    Cash,
    BankTransfer,
    Cheque,
    Upi,
}

impl PaymentMode {
    pub const VALUES: &'static [&'static str] = &["cash", "bankTransfer", "cheque", "upi"];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PayrollStatus {
    #[default]
    Pending,
    Paid,
}

impl PayrollStatus {
    pub const VALUES: &'static [&'static str] = &["pending", "paid"];
}

// =============================================================================
// School
// =============================================================================

/// A school. Target of the `schoolId` existence checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Logo URL shown on receipts.
    pub logo: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl School {
    pub fn new(input: CreateSchool, now: DateTime<Utc>) -> Self {
        School {
            id: new_id(),
            name: input.name,
            address: input.address,
            phone: input.phone,
            email: input.email,
            logo: input.logo,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, changes: UpdateSchool, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(address) = changes.address {
            self.address = address;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if changes.logo.is_some() {
            self.logo = changes.logo;
        }
        self.updated_at = now;
    }
}

// =============================================================================
// Attendance Regularization
// =============================================================================

/// A request to correct a recorded attendance entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRegularization {
    pub id: String,
    pub attendance_id: String,
    pub student_id: String,
    pub class_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub reason: String,
    pub status: RegularizationStatus,
    /// Fixed at creation.
    #[serde(rename = "type")]
    pub regularization_type: RegularizationType,
    #[ts(as = "Option<String>")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRegularization {
    /// Builds a new request; status starts as pending.
    pub fn new(input: CreateRegularization, now: DateTime<Utc>) -> Self {
        AttendanceRegularization {
            id: new_id(),
            attendance_id: input.attendance_id,
            student_id: input.student_id,
            class_id: input.class_id,
            date: input.date,
            reason: input.reason,
            status: RegularizationStatus::default(),
            regularization_type: input.regularization_type,
            reviewed_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, changes: UpdateRegularization, now: DateTime<Utc>) -> CoreResult<()> {
        ensure_unchanged(
            "AttendanceRegularization",
            "type",
            &self.regularization_type,
            changes.regularization_type.as_ref(),
        )?;

        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(reason) = changes.reason {
            self.reason = reason;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Records a review decision. Moving back to pending clears `reviewed_at`.
    pub fn review(&mut self, status: RegularizationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.reviewed_at = match status {
            RegularizationStatus::Pending => None,
            _ => Some(now),
        };
        self.updated_at = now;
    }
}

// =============================================================================
// Class
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub class_name: String,
    pub class_room: Option<String>,
    pub school_id: String,
    pub class_teacher_id: String,
    /// Subject identifiers taught in this class (never empty).
    pub subjects: Vec<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn new(input: CreateClass, now: DateTime<Utc>) -> Self {
        Class {
            id: new_id(),
            class_name: input.class_name,
            class_room: input.class_room,
            school_id: input.school_id,
            class_teacher_id: input.class_teacher_id,
            subjects: input.subjects,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, changes: UpdateClass, now: DateTime<Utc>) {
        if let Some(class_name) = changes.class_name {
            self.class_name = class_name;
        }
        if changes.class_room.is_some() {
            self.class_room = changes.class_room;
        }
        if let Some(school_id) = changes.school_id {
            self.school_id = school_id;
        }
        if let Some(class_teacher_id) = changes.class_teacher_id {
            self.class_teacher_id = class_teacher_id;
        }
        if let Some(subjects) = changes.subjects {
            self.subjects = subjects;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}

// =============================================================================
// Class Test
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClassTest {
    pub id: String,
    pub subject_id: String,
    /// Fixed at creation.
    pub class_id: String,
    /// Fixed at creation; must name an existing school.
    pub school_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_mark: i64,
    pub description: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ClassTest {
    pub fn new(input: CreateClassTest, now: DateTime<Utc>) -> Self {
        ClassTest {
            id: new_id(),
            subject_id: input.subject_id,
            class_id: input.class_id,
            school_id: input.school_id,
            date: input.date,
            total_mark: input.total_mark,
            description: input.description,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update.
    ///
    /// ## Immutable Fields
    /// `classId` and `schoolId` are checked before anything is applied: a
    /// differing value rejects the whole update and leaves `self` untouched.
    pub fn apply_update(&mut self, changes: UpdateClassTest, now: DateTime<Utc>) -> CoreResult<()> {
        ensure_unchanged("ClassTest", "classId", &self.class_id, changes.class_id.as_ref())?;
        ensure_unchanged("ClassTest", "schoolId", &self.school_id, changes.school_id.as_ref())?;

        if let Some(subject_id) = changes.subject_id {
            self.subject_id = subject_id;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(total_mark) = changes.total_mark {
            self.total_mark = total_mark;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        Ok(())
    }
}

// =============================================================================
// Semester Exam
// =============================================================================

/// One paper of a semester exam. Owned by its [`SemExam`]; has no identity
/// of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExamEntry {
    pub subject_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
    pub description: Option<String>,
}

impl From<ExamEntryInput> for ExamEntry {
    fn from(input: ExamEntryInput) -> Self {
        ExamEntry {
            subject_id: input.subject_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            description: input.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SemExam {
    pub id: String,
    /// Fixed at creation; must name an existing school.
    pub school_id: String,
    /// Fixed at creation.
    pub class_id: String,
    /// Papers in timetable order.
    pub exams: Vec<ExamEntry>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl SemExam {
    pub fn new(input: CreateSemExam, now: DateTime<Utc>) -> Self {
        SemExam {
            id: new_id(),
            school_id: input.school_id,
            class_id: input.class_id,
            exams: input.exams.into_iter().map(ExamEntry::from).collect(),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update; `exams`, when present, replaces the whole
    /// timetable.
    pub fn apply_update(&mut self, changes: UpdateSemExam, now: DateTime<Utc>) -> CoreResult<()> {
        ensure_unchanged("SemExam", "schoolId", &self.school_id, changes.school_id.as_ref())?;
        ensure_unchanged("SemExam", "classId", &self.class_id, changes.class_id.as_ref())?;

        if let Some(exams) = changes.exams {
            self.exams = exams.into_iter().map(ExamEntry::from).collect();
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        Ok(())
    }
}

// =============================================================================
// Expense
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    /// Never negative.
    #[serde(with = "crate::money::major_units")]
    #[ts(type = "number")]
    pub amount: Money,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub school_id: String,
    pub category: String,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(input: CreateExpense, now: DateTime<Utc>) -> Self {
        Expense {
            id: new_id(),
            description: input.description,
            amount: input.amount,
            date: input.date,
            school_id: input.school_id,
            category: input.category,
            created_by: input.created_by,
            updated_by: None,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, changes: UpdateExpense, now: DateTime<Utc>) {
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(school_id) = changes.school_id {
            self.school_id = school_id;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(created_by) = changes.created_by {
            self.created_by = created_by;
        }
        if changes.updated_by.is_some() {
            self.updated_by = changes.updated_by;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidatedInput;
    use chrono::Duration;
    use serde_json::json;

    const SCHOOL: &str = "00000000-0000-4000-8000-000000000001";
    const CLASS: &str = "00000000-0000-4000-8000-000000000002";
    const SUBJECT: &str = "00000000-0000-4000-8000-000000000003";
    const OTHER: &str = "00000000-0000-4000-8000-0000000000ff";

    fn class_test() -> ClassTest {
        let input = CreateClassTest::parse(&json!({
            "subjectId": SUBJECT,
            "classId": CLASS,
            "schoolId": SCHOOL,
            "date": "2024-07-01",
            "totalMark": 50,
        }))
        .unwrap();
        ClassTest::new(input, Utc::now())
    }

    #[test]
    fn test_new_records_default_active() {
        let test = class_test();
        assert!(test.is_active);
        assert_eq!(test.created_at, test.updated_at);
        assert!(Uuid::parse_str(&test.id).is_ok());
    }

    #[test]
    fn test_class_test_rejects_class_change_as_a_whole() {
        let mut test = class_test();
        let before = test.clone();
        let changes = UpdateClassTest::parse(&json!({
            "classId": OTHER,
            "description": "Unit 3",
            "totalMark": 40,
        }))
        .unwrap();

        let err = test.apply_update(changes, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::ImmutableField { ref field, .. } if field == "classId"));
        assert_eq!(test, before);
    }

    #[test]
    fn test_class_test_accepts_same_class_id() {
        let mut test = class_test();
        let later = test.updated_at + Duration::minutes(5);
        let changes = UpdateClassTest::parse(&json!({
            "classId": CLASS,
            "description": "Unit 3",
        }))
        .unwrap();

        test.apply_update(changes, later).unwrap();
        assert_eq!(test.description.as_deref(), Some("Unit 3"));
        assert_eq!(test.updated_at, later);
    }

    #[test]
    fn test_regularization_defaults_and_review() {
        let input = CreateRegularization::parse(&json!({
            "attendanceId": OTHER,
            "studentId": SUBJECT,
            "classId": CLASS,
            "date": "2024-07-01",
            "reason": "Medical appointment",
            "type": "halfDay",
        }))
        .unwrap();
        let mut request = AttendanceRegularization::new(input, Utc::now());
        assert_eq!(request.status, RegularizationStatus::Pending);
        assert!(request.reviewed_at.is_none());

        let now = Utc::now();
        request.review(RegularizationStatus::Approved, now);
        assert_eq!(request.reviewed_at, Some(now));

        request.review(RegularizationStatus::Pending, now);
        assert!(request.reviewed_at.is_none());
    }

    #[test]
    fn test_regularization_type_is_fixed() {
        let input = CreateRegularization::parse(&json!({
            "attendanceId": OTHER,
            "studentId": SUBJECT,
            "classId": CLASS,
            "date": "2024-07-01",
            "reason": "Bus breakdown",
            "type": "fullDay",
        }))
        .unwrap();
        let mut request = AttendanceRegularization::new(input, Utc::now());

        let changes = UpdateRegularization::parse(&json!({ "type": "halfDay", "reason": "x" })).unwrap();
        assert!(request.apply_update(changes, Utc::now()).is_err());
        assert_eq!(request.reason, "Bus breakdown");
    }

    #[test]
    fn test_record_wire_names() {
        let json = serde_json::to_value(class_test()).unwrap();
        assert_eq!(json["schoolId"], json!(SCHOOL));
        assert_eq!(json["totalMark"], json!(50));
        assert_eq!(json["date"], json!("2024-07-01"));
        assert_eq!(json["isActive"], json!(true));
    }
}
