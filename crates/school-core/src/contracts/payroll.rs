//! Payroll contracts.
//!
//! One payroll row per employee per month. Net pay is
//! `basicSalary + allowances - deductions`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{amount, date, id, one_of};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMode, PayrollStatus};
use crate::validation::{Contract, Rule, ValidatedInput};

pub static CREATE_PAYROLL: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreatePayroll")
        .required("employeeId", id())
        .required("schoolId", id())
        .required("month", vec![Rule::IsInteger, Rule::Min(1.0), Rule::Max(12.0)])
        .required("year", vec![Rule::IsInteger, Rule::Min(2000.0), Rule::Max(2100.0)])
        .required("basicSalary", amount())
        .optional("allowances", amount())
        .optional("deductions", amount())
        .optional("paymentMode", one_of(PaymentMode::VALUES))
        .optional("paymentDate", date())
        .optional("status", one_of(PayrollStatus::VALUES))
});

pub static UPDATE_PAYROLL: Lazy<Contract> = Lazy::new(|| CREATE_PAYROLL.partial());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayroll {
    pub employee_id: String,
    pub school_id: String,
    pub month: u32,
    pub year: i32,
    #[serde(with = "crate::money::major_units")]
    pub basic_salary: Money,
    #[serde(default, with = "crate::money::major_units::option")]
    pub allowances: Option<Money>,
    #[serde(default, with = "crate::money::major_units::option")]
    pub deductions: Option<Money>,
    pub payment_mode: Option<PaymentMode>,
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PayrollStatus,
}

impl CreatePayroll {
    /// Net pay for the month. May be negative when deductions exceed pay.
    pub fn net_salary(&self) -> CoreResult<Money> {
        self.basic_salary
            .checked_add(self.allowances.unwrap_or_default())
            .and_then(|gross| gross.checked_sub(self.deductions.unwrap_or_default()))
            .ok_or_else(|| CoreError::overflow("Net salary"))
    }
}

impl ValidatedInput for CreatePayroll {
    fn contract() -> &'static Contract {
        &CREATE_PAYROLL
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayroll {
    pub employee_id: Option<String>,
    pub school_id: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    #[serde(default, with = "crate::money::major_units::option")]
    pub basic_salary: Option<Money>,
    #[serde(default, with = "crate::money::major_units::option")]
    pub allowances: Option<Money>,
    #[serde(default, with = "crate::money::major_units::option")]
    pub deductions: Option<Money>,
    pub payment_mode: Option<PaymentMode>,
    pub payment_date: Option<NaiveDate>,
    pub status: Option<PayrollStatus>,
}

impl ValidatedInput for UpdatePayroll {
    fn contract() -> &'static Contract {
        &UPDATE_PAYROLL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "6f9619ff-8b86-4d11-b42d-00c04fc964ff";

    #[test]
    fn test_create_payroll_defaults_to_pending() {
        let payroll = CreatePayroll::parse(&json!({
            "employeeId": ID,
            "schoolId": ID,
            "month": "7",
            "year": 2024,
            "basicSalary": 30000,
            "allowances": 2500.5,
            "deductions": 1000,
        }))
        .unwrap();

        assert_eq!(payroll.month, 7);
        assert_eq!(payroll.status, PayrollStatus::Pending);
        assert_eq!(payroll.net_salary().unwrap(), Money::from_cents(3_150_050));
    }

    #[test]
    fn test_month_and_year_bounds() {
        let errors = CreatePayroll::parse(&json!({
            "employeeId": ID,
            "schoolId": ID,
            "month": 13,
            "year": 1999,
            "basicSalary": 100,
            "paymentMode": "crypto",
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["month", "year", "paymentMode"]);
    }

    #[test]
    fn test_salary_amounts_are_bounded() {
        let errors = CreatePayroll::parse(&json!({
            "employeeId": ID,
            "schoolId": ID,
            "month": 7,
            "year": 2024,
            "basicSalary": 92_233_720_368_547_758_i64,
            "allowances": 1_000_000_001,
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["basicSalary", "allowances"]);
    }

    #[test]
    fn test_net_salary_overflow_is_an_error() {
        let mut payroll = CreatePayroll::parse(&json!({
            "employeeId": ID,
            "schoolId": ID,
            "month": 7,
            "year": 2024,
            "basicSalary": 100,
        }))
        .unwrap();
        payroll.basic_salary = Money::from_cents(i64::MAX);
        payroll.allowances = Some(Money::from_cents(1));

        assert!(matches!(payroll.net_salary(), Err(CoreError::AmountOverflow { .. })));
    }

    #[test]
    fn test_update_payroll_marks_paid() {
        let update = UpdatePayroll::parse(&json!({
            "status": "paid",
            "paymentMode": "bankTransfer",
            "paymentDate": "2024-07-31",
        }))
        .unwrap();
        assert_eq!(update.status, Some(PayrollStatus::Paid));
        assert_eq!(update.payment_mode, Some(PaymentMode::BankTransfer));
    }
}
