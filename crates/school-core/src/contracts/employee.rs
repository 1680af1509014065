//! Employee contracts.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{amount, date, id, one_of, text};
use crate::money::Money;
use crate::types::EmployeeRole;
use crate::validation::{Contract, Rule, ValidatedInput};

pub static CREATE_EMPLOYEE: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateEmployee")
        .required("name", text(100))
        .required("email", vec![Rule::IsString, Rule::Email])
        .required("phone", vec![Rule::IsString, Rule::Phone])
        .required("role", one_of(EmployeeRole::VALUES))
        .required("schoolId", id())
        .required("joiningDate", date())
        .optional("dateOfBirth", date())
        .required("salary", amount())
        .optional("address", vec![Rule::IsString, Rule::MaxLength(500)])
});

pub static UPDATE_EMPLOYEE: Lazy<Contract> = Lazy::new(|| CREATE_EMPLOYEE.partial());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: EmployeeRole,
    pub school_id: String,
    pub joining_date: NaiveDate,
    pub date_of_birth: Option<NaiveDate>,
    /// Monthly salary.
    #[serde(with = "crate::money::major_units")]
    pub salary: Money,
    pub address: Option<String>,
}

impl ValidatedInput for CreateEmployee {
    fn contract() -> &'static Contract {
        &CREATE_EMPLOYEE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<EmployeeRole>,
    pub school_id: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, with = "crate::money::major_units::option")]
    pub salary: Option<Money>,
    pub address: Option<String>,
}

impl ValidatedInput for UpdateEmployee {
    fn contract() -> &'static Contract {
        &UPDATE_EMPLOYEE
    }
}
