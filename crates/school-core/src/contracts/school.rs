//! School contracts.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::text;
use crate::validation::{Contract, Rule, ValidatedInput};

pub static CREATE_SCHOOL: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateSchool")
        .required("name", text(200))
        .required("address", text(500))
        .required("phone", vec![Rule::IsString, Rule::Phone])
        .required("email", vec![Rule::IsString, Rule::Email])
        .optional("logo", vec![Rule::IsString, Rule::MaxLength(2048)])
});

pub static UPDATE_SCHOOL: Lazy<Contract> = Lazy::new(|| CREATE_SCHOOL.partial());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchool {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub logo: Option<String>,
}

impl ValidatedInput for CreateSchool {
    fn contract() -> &'static Contract {
        &CREATE_SCHOOL
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchool {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
}

impl ValidatedInput for UpdateSchool {
    fn contract() -> &'static Contract {
        &UPDATE_SCHOOL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_school() {
        let school = CreateSchool::parse(&json!({
            "name": "Green Valley High",
            "address": "12 Hill Road",
            "phone": "+919876543210",
            "email": "office@greenvalley.edu",
        }))
        .unwrap();
        assert_eq!(school.name, "Green Valley High");
        assert!(school.logo.is_none());

        let errors = CreateSchool::parse(&json!({ "name": "X", "email": "nope" })).unwrap_err();
        assert_eq!(errors.fields(), vec!["address", "phone", "email"]);
    }
}
