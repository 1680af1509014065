//! Fee receipt request contract.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{amount, date, id, text, MAX_QUANTITY};
use crate::money::Money;
use crate::receipt::{ReceiptLine, ReceiptRequest, SchoolDetails};
use crate::validation::{Contract, Rule, ValidatedInput};

pub static RECEIPT_ITEM: Lazy<Contract> = Lazy::new(|| {
    Contract::new("ReceiptItem")
        .required("name", text(200))
        .optional("description", vec![Rule::IsString, Rule::MaxLength(500)])
        .required("quantity", vec![Rule::IsInteger, Rule::Min(1.0), Rule::Max(MAX_QUANTITY)])
        .required("unitPrice", amount())
});

pub static GENERATE_RECEIPT: Lazy<Contract> = Lazy::new(|| {
    Contract::new("GenerateReceipt")
        .required(
            "items",
            vec![Rule::IsArray, Rule::ArrayNotEmpty, Rule::EachObject(&RECEIPT_ITEM)],
        )
        .required("dueDate", date())
        .required("paymentMode", text(50))
        .required("address", text(500))
        .required("className", text(50))
        .required("name", text(100))
        .required("schoolId", id())
        .required("paymentId", text(100))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItemInput {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    #[serde(with = "crate::money::major_units")]
    pub unit_price: Money,
}

impl From<ReceiptItemInput> for ReceiptLine {
    fn from(item: ReceiptItemInput) -> Self {
        ReceiptLine {
            name: item.name,
            description: item.description.unwrap_or_default(),
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Payer side of a receipt. The school side is loaded by `schoolId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReceipt {
    pub items: Vec<ReceiptItemInput>,
    pub due_date: NaiveDate,
    pub payment_mode: String,
    pub address: String,
    pub class_name: String,
    /// Payer name.
    pub name: String,
    pub school_id: String,
    pub payment_id: String,
}

impl GenerateReceipt {
    /// Combines the payer side with the loaded school.
    pub fn into_request(self, school: SchoolDetails, receipt_date: NaiveDate) -> ReceiptRequest {
        ReceiptRequest {
            lines: self.items.into_iter().map(ReceiptLine::from).collect(),
            due_date: self.due_date,
            payment_mode: self.payment_mode,
            address: self.address,
            class_name: self.class_name,
            name: self.name,
            school,
            payment_id: self.payment_id,
            receipt_date,
        }
    }
}

impl ValidatedInput for GenerateReceipt {
    fn contract() -> &'static Contract {
        &GENERATE_RECEIPT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_receipt() {
        let request = GenerateReceipt::parse(&json!({
            "items": [
                { "name": "Tuition", "quantity": 2, "unitPrice": 50 },
                { "name": "Library", "description": "Annual", "quantity": "1", "unitPrice": "30" },
            ],
            "dueDate": "2024-10-10",
            "paymentMode": "Cash",
            "address": "4 Lake View",
            "className": "Grade 5 - A",
            "name": "Meera Shah",
            "schoolId": "6f9619ff-8b86-4d11-b42d-00c04fc964ff",
            "paymentId": "PAY-0042",
        }))
        .unwrap();

        let school = SchoolDetails {
            name: "Green Valley".into(),
            address: "12 Hill Road".into(),
            phone: "9876543210".into(),
            email: "office@gv.edu".into(),
            logo: None,
        };
        let receipt_date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let receipt = request.into_request(school, receipt_date);

        assert_eq!(receipt.lines[0].quantity, 2);
        assert_eq!(receipt.lines[0].description, "");
        assert_eq!(receipt.lines[1].unit_price, Money::from_major(30));
        assert_eq!(receipt.lines[1].description, "Annual");
        assert_eq!(receipt.total().unwrap(), Money::from_major(130));
        assert_eq!(receipt.payment_id, "PAY-0042");
    }

    #[test]
    fn test_item_errors() {
        let errors = GenerateReceipt::parse(&json!({
            "items": [{ "name": "Tuition", "quantity": 0, "unitPrice": -5 }],
            "dueDate": "2024-10-10",
            "paymentMode": "Cash",
            "address": "4 Lake View",
            "className": "Grade 5 - A",
            "name": "Meera Shah",
            "schoolId": "6f9619ff-8b86-4d11-b42d-00c04fc964ff",
            "paymentId": "PAY-0042",
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["items[0].quantity", "items[0].unitPrice"]);
    }

    #[test]
    fn test_huge_quantity_and_price_rejected() {
        let errors = GenerateReceipt::parse(&json!({
            "items": [{ "name": "Tuition", "quantity": 1_000_000_000_000_000_i64, "unitPrice": 100000 }, { "name": "Bus", "quantity": 1, "unitPrice": 5_000_000_000_i64 }],
            "dueDate": "2024-10-10",
            "paymentMode": "Cash",
            "address": "4 Lake View",
            "className": "Grade 5 - A",
            "name": "Meera Shah",
            "schoolId": "6f9619ff-8b86-4d11-b42d-00c04fc964ff",
            "paymentId": "PAY-0042",
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["items[0].quantity", "items[1].unitPrice"]);
    }
}
