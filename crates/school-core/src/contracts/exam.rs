//! Class test and semester exam contracts.
//!
//! ```text
//! CreateSemExam
//! ├── schoolId, classId
//! └── exams[1..]  ── each validated against EXAM_ENTRY
//!     ├── subjectId
//!     ├── date
//!     ├── startTime, endTime   (HH:MM, start before end)
//!     └── description?
//! ```

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{date, flag, id, text};
use crate::validation::{Contract, Rule, ValidatedInput};

fn time() -> Vec<Rule> {
    vec![Rule::IsString, Rule::IsTime]
}

// =============================================================================
// Class Test
// =============================================================================

pub static CREATE_CLASS_TEST: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateClassTest")
        .required("subjectId", id())
        .required("classId", id())
        .required("schoolId", id())
        .required("date", date())
        .required("totalMark", vec![Rule::IsInteger, Rule::Min(1.0)])
        .optional("description", vec![Rule::IsString, Rule::MaxLength(500)])
        .optional("isActive", flag())
});

/// `classId` and `schoolId` stay in the update shape; changing them is
/// rejected by the record, not here.
pub static UPDATE_CLASS_TEST: Lazy<Contract> = Lazy::new(|| CREATE_CLASS_TEST.partial());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassTest {
    pub subject_id: String,
    pub class_id: String,
    pub school_id: String,
    pub date: NaiveDate,
    pub total_mark: i64,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl ValidatedInput for CreateClassTest {
    fn contract() -> &'static Contract {
        &CREATE_CLASS_TEST
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassTest {
    pub subject_id: Option<String>,
    pub class_id: Option<String>,
    pub school_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub total_mark: Option<i64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl ValidatedInput for UpdateClassTest {
    fn contract() -> &'static Contract {
        &UPDATE_CLASS_TEST
    }
}

// =============================================================================
// Semester Exam
// =============================================================================

/// One paper in a semester exam timetable.
pub static EXAM_ENTRY: Lazy<Contract> = Lazy::new(|| {
    Contract::new("ExamEntry")
        .required("subjectId", id())
        .required("date", date())
        .required("startTime", time())
        .required("endTime", time())
        .optional("description", text(500))
});

pub static CREATE_SEM_EXAM: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateSemExam")
        .required("schoolId", id())
        .required("classId", id())
        .required(
            "exams",
            vec![
                Rule::IsArray,
                Rule::ArrayNotEmpty,
                Rule::EachObject(&EXAM_ENTRY),
                Rule::Check {
                    predicate: papers_end_after_start,
                    message: "entries must end after they start",
                },
            ],
        )
        .optional("isActive", flag())
});

pub static UPDATE_SEM_EXAM: Lazy<Contract> = Lazy::new(|| CREATE_SEM_EXAM.partial());

/// Runs after `EXAM_ENTRY`, so times are already `HH:MM:SS` and compare
/// lexically.
fn papers_end_after_start(exams: &serde_json::Value) -> bool {
    exams.as_array().is_some_and(|entries| {
        entries.iter().all(|entry| {
            match (entry["startTime"].as_str(), entry["endTime"].as_str()) {
                (Some(start), Some(end)) => start < end,
                _ => false,
            }
        })
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamEntryInput {
    pub subject_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSemExam {
    pub school_id: String,
    pub class_id: String,
    pub exams: Vec<ExamEntryInput>,
    pub is_active: Option<bool>,
}

impl ValidatedInput for CreateSemExam {
    fn contract() -> &'static Contract {
        &CREATE_SEM_EXAM
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSemExam {
    pub school_id: Option<String>,
    pub class_id: Option<String>,
    pub exams: Option<Vec<ExamEntryInput>>,
    pub is_active: Option<bool>,
}

impl ValidatedInput for UpdateSemExam {
    fn contract() -> &'static Contract {
        &UPDATE_SEM_EXAM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;

    const SCHOOL: &str = "6f9619ff-8b86-4d11-b42d-00c04fc964ff";
    const SUBJECT: &str = "0b8a4c52-1f7e-4f0e-9a53-5a3d2e0c9b11";

    #[test]
    fn test_class_test_total_mark() {
        let body = |mark: serde_json::Value| {
            json!({
                "subjectId": SUBJECT,
                "classId": SCHOOL,
                "schoolId": SCHOOL,
                "date": "2024-08-12",
                "totalMark": mark,
            })
        };

        assert_eq!(CreateClassTest::parse(&body(json!("25"))).unwrap().total_mark, 25);
        assert!(CreateClassTest::parse(&body(json!(0))).is_err());
        assert!(CreateClassTest::parse(&body(json!(12.5))).is_err());
    }

    #[test]
    fn test_class_test_missing_school_is_named() {
        let errors = CreateClassTest::parse(&json!({
            "subjectId": SUBJECT,
            "classId": SCHOOL,
            "date": "2024-08-12",
            "totalMark": 20,
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["schoolId"]);
        assert!(matches!(errors.iter().next(), Some(ValidationError::Required { .. })));
    }

    #[test]
    fn test_sem_exam_entries() {
        let exam = CreateSemExam::parse(&json!({
            "schoolId": SCHOOL,
            "classId": SCHOOL,
            "exams": [
                { "subjectId": SUBJECT, "date": "2024-11-04", "startTime": "09:30", "endTime": "12:30" },
                { "subjectId": SUBJECT, "date": "2024-11-06", "startTime": "09:30:00", "endTime": "11:00", "description": "Practical" },
            ],
        }))
        .unwrap();

        assert_eq!(exam.exams.len(), 2);
        assert_eq!(exam.exams[0].start_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(exam.exams[1].description.as_deref(), Some("Practical"));
    }

    #[test]
    fn test_sem_exam_entry_errors_have_paths() {
        let errors = CreateSemExam::parse(&json!({
            "schoolId": SCHOOL,
            "classId": SCHOOL,
            "exams": [
                { "subjectId": SUBJECT, "date": "2024-11-04", "startTime": "9am", "endTime": "12:30" },
            ],
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["exams[0].startTime"]);

        let errors = CreateSemExam::parse(&json!({
            "schoolId": SCHOOL,
            "classId": SCHOOL,
            "exams": [
                { "subjectId": SUBJECT, "date": "2024-11-04", "startTime": "12:30", "endTime": "09:30" },
            ],
        }))
        .unwrap_err();
        assert_eq!(errors.to_string(), "exams entries must end after they start");

        assert!(CreateSemExam::parse(&json!({ "schoolId": SCHOOL, "classId": SCHOOL, "exams": [] })).is_err());
    }

    #[test]
    fn test_partial_sem_exam() {
        assert!(UpdateSemExam::parse(&json!({})).is_ok());
        let update = UpdateSemExam::parse(&json!({ "isActive": false })).unwrap();
        assert_eq!(update.is_active, Some(false));
        assert!(update.exams.is_none());
    }
}
