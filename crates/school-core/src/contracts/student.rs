//! Student admission contracts.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{date, id, text};
use crate::validation::{Contract, Rule, ValidatedInput};

pub static CREATE_STUDENT: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateStudent")
        .required("name", text(100))
        .optional("email", vec![Rule::IsString, Rule::Email])
        .required("dateOfBirth", date())
        .required("admissionDate", date())
        .required("classId", id())
        .required("schoolId", id())
        .required("guardianName", text(100))
        .required("guardianPhone", vec![Rule::IsString, Rule::Phone])
        .optional("rollNumber", vec![Rule::IsString, Rule::NotEmpty, Rule::MaxLength(20)])
});

pub static UPDATE_STUDENT: Lazy<Contract> = Lazy::new(|| CREATE_STUDENT.partial());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudent {
    pub name: String,
    pub email: Option<String>,
    pub date_of_birth: NaiveDate,
    pub admission_date: NaiveDate,
    pub class_id: String,
    pub school_id: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub roll_number: Option<String>,
}

impl ValidatedInput for CreateStudent {
    fn contract() -> &'static Contract {
        &CREATE_STUDENT
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    pub class_id: Option<String>,
    pub school_id: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub roll_number: Option<String>,
}

impl ValidatedInput for UpdateStudent {
    fn contract() -> &'static Contract {
        &UPDATE_STUDENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "6f9619ff-8b86-4d11-b42d-00c04fc964ff";

    #[test]
    fn test_create_student() {
        let student = CreateStudent::parse(&json!({
            "name": "Kabir Shah",
            "dateOfBirth": "2015-03-21",
            "admissionDate": "2021-04-01",
            "classId": ID,
            "schoolId": ID,
            "guardianName": "Meera Shah",
            "guardianPhone": "+91 (98765) 43210",
            "rollNumber": "5A-17",
        }))
        .unwrap();
        assert_eq!(student.roll_number.as_deref(), Some("5A-17"));
        assert!(student.email.is_none());
    }

    #[test]
    fn test_missing_guardian() {
        let errors = CreateStudent::parse(&json!({
            "name": "Kabir Shah",
            "dateOfBirth": "21-03-2015",
            "admissionDate": "2021-04-01",
            "classId": ID,
            "schoolId": ID,
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["dateOfBirth", "guardianName", "guardianPhone"]);
    }
}
