//! Expense contracts.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{amount, date, flag, id, text};
use crate::money::Money;
use crate::validation::{Contract, ValidatedInput};

pub static CREATE_EXPENSE: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateExpense")
        .required("description", text(500))
        .required("amount", amount())
        .required("date", date())
        .required("schoolId", id())
        .required("category", text(100))
        .required("createdBy", id())
        .optional("isActive", flag())
});

/// Every create field, optional, plus who made the change.
pub static UPDATE_EXPENSE: Lazy<Contract> =
    Lazy::new(|| CREATE_EXPENSE.partial().optional("updatedBy", id()));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpense {
    pub description: String,
    #[serde(with = "crate::money::major_units")]
    pub amount: Money,
    pub date: NaiveDate,
    pub school_id: String,
    /// Free-form category label (e.g. "Stationery").
    pub category: String,
    pub created_by: String,
    pub is_active: Option<bool>,
}

impl ValidatedInput for CreateExpense {
    fn contract() -> &'static Contract {
        &CREATE_EXPENSE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpense {
    pub description: Option<String>,
    #[serde(default, with = "crate::money::major_units::option")]
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub school_id: Option<String>,
    pub category: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub is_active: Option<bool>,
}

impl ValidatedInput for UpdateExpense {
    fn contract() -> &'static Contract {
        &UPDATE_EXPENSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "6f9619ff-8b86-4d11-b42d-00c04fc964ff";

    #[test]
    fn test_create_expense() {
        let expense = CreateExpense::parse(&json!({
            "description": "Chalk and dusters",
            "amount": 349.99,
            "date": "2024-08-01",
            "schoolId": ID,
            "category": "Stationery",
            "createdBy": ID,
        }))
        .unwrap();
        assert_eq!(expense.amount, Money::from_cents(34999));
    }

    #[test]
    fn test_amount_rules() {
        let body = |amount: serde_json::Value| {
            json!({
                "description": "Bus fuel",
                "amount": amount,
                "date": "2024-08-01",
                "schoolId": ID,
                "category": "Transport",
                "createdBy": ID,
            })
        };

        assert!(CreateExpense::parse(&body(json!(-0.01))).is_err());
        assert!(CreateExpense::parse(&body(json!(10.005))).is_err());
        assert!(CreateExpense::parse(&body(json!("abc"))).is_err());
        assert_eq!(CreateExpense::parse(&body(json!(0))).unwrap().amount, Money::zero());
    }

    #[test]
    fn test_update_expense_accepts_updated_by() {
        assert!(UpdateExpense::parse(&json!({})).is_ok());

        let update = UpdateExpense::parse(&json!({ "amount": "120", "updatedBy": ID })).unwrap();
        assert_eq!(update.amount, Some(Money::from_major(120)));
        assert_eq!(update.updated_by.as_deref(), Some(ID));

        assert!(CreateExpense::contract().field("updatedBy").is_none());
    }
}
