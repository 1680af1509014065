//! Attendance marking and regularization contracts.
//!
//! ```text
//! MarkAttendance ──► daily mark (present / absent / late / leave)
//!
//! CreateRegularization ──► pending ──ReviewRegularization──► approved
//!                                                        └─► rejected
//! ```

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{date, id, one_of, text};
use crate::types::{AttendanceStatus, RegularizationStatus, RegularizationType};
use crate::validation::{Contract, Rule, ValidatedInput};

// =============================================================================
// Daily Attendance
// =============================================================================

pub static MARK_ATTENDANCE: Lazy<Contract> = Lazy::new(|| {
    Contract::new("MarkAttendance")
        .required("studentId", id())
        .required("classId", id())
        .required("schoolId", id())
        .required("date", date())
        .required("status", one_of(AttendanceStatus::VALUES))
        .optional("remarks", vec![Rule::IsString, Rule::MaxLength(500)])
});

pub static UPDATE_ATTENDANCE: Lazy<Contract> = Lazy::new(|| MARK_ATTENDANCE.partial());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    pub student_id: String,
    pub class_id: String,
    pub school_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

impl ValidatedInput for MarkAttendance {
    fn contract() -> &'static Contract {
        &MARK_ATTENDANCE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendance {
    pub student_id: Option<String>,
    pub class_id: Option<String>,
    pub school_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    pub remarks: Option<String>,
}

impl ValidatedInput for UpdateAttendance {
    fn contract() -> &'static Contract {
        &UPDATE_ATTENDANCE
    }
}

// =============================================================================
// Regularization
// =============================================================================

pub static CREATE_REGULARIZATION: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateRegularization")
        .required("attendanceId", id())
        .required("studentId", id())
        .required("classId", id())
        .required("date", date())
        .required("reason", text(1000))
        .required("type", one_of(RegularizationType::VALUES))
});

/// Only the request's own details can be edited; identifiers are not part
/// of the update shape at all.
pub static UPDATE_REGULARIZATION: Lazy<Contract> = Lazy::new(|| {
    Contract::new("UpdateRegularization")
        .optional("date", date())
        .optional("reason", text(1000))
        .optional("type", one_of(RegularizationType::VALUES))
});

pub static REVIEW_REGULARIZATION: Lazy<Contract> = Lazy::new(|| {
    Contract::new("ReviewRegularization").required("status", one_of(RegularizationStatus::VALUES))
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegularization {
    pub attendance_id: String,
    pub student_id: String,
    pub class_id: String,
    pub date: NaiveDate,
    pub reason: String,
    #[serde(rename = "type")]
    pub regularization_type: RegularizationType,
}

impl ValidatedInput for CreateRegularization {
    fn contract() -> &'static Contract {
        &CREATE_REGULARIZATION
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegularization {
    pub date: Option<NaiveDate>,
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub regularization_type: Option<RegularizationType>,
}

impl ValidatedInput for UpdateRegularization {
    fn contract() -> &'static Contract {
        &UPDATE_REGULARIZATION
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRegularization {
    pub status: RegularizationStatus,
}

impl ValidatedInput for ReviewRegularization {
    fn contract() -> &'static Contract {
        &REVIEW_REGULARIZATION
    }
}
