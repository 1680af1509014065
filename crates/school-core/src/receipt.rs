//! # Receipt Rendering
//!
//! Turns fee line items plus payer and school details into an HTML page by
//! placeholder substitution.
//!
//! ## Rendering Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lines ──► one ROW_TEMPLATE per line ──► concatenated ──► {rows}        │
//! │    │                                                                    │
//! │    └──► Σ quantity × unitPrice ──────────────────────────► {total-amount}│
//! │                                                                         │
//! │  payer / school / dates ─────────────────────────────────► {name}, ...  │
//! │                                                                         │
//! │  page template ──► each {token} replaced once ──► HTML                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every interpolated text value is HTML-escaped. Amounts render as plain
//! two-place decimals (`130.00`). Loading the page template is the caller's
//! job; this module never touches the filesystem.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::School;

/// Row fragment repeated once per line item.
pub const ROW_TEMPLATE: &str = "<tr>\
<td>[index]</td>\
<td>[name]</td>\
<td>[des]</td>\
<td>[count]</td>\
<td>[unitPrice]</td>\
<td>[totalPrice]</td>\
</tr>";

/// Page placeholders, in the order they are substituted.
pub const PAGE_PLACEHOLDERS: &[&str] = &[
    "{rows}",
    "{due-date}",
    "{payment-mode}",
    "{total-amount}",
    "{address}",
    "{class}",
    "{name}",
    "{school-name}",
    "{school-address}",
    "{school-phone}",
    "{school-email}",
    "{school-logo}",
    "{receipt-date}",
    "{payment-id}",
];

const DATE_FORMAT: &str = "%d-%m-%Y";

// =============================================================================
// Inputs
// =============================================================================

/// One billed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl ReceiptLine {
    /// Quantity × unit price; fails instead of wrapping.
    pub fn total(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| CoreError::overflow(format!("Line total for '{}'", self.name)))
    }
}

/// The school block printed in the receipt header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub logo: Option<String>,
}

impl From<School> for SchoolDetails {
    fn from(school: School) -> Self {
        SchoolDetails {
            name: school.name,
            address: school.address,
            phone: school.phone,
            email: school.email,
            logo: school.logo,
        }
    }
}

/// Everything needed to fill a receipt page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub lines: Vec<ReceiptLine>,
    pub due_date: NaiveDate,
    pub payment_mode: String,
    pub address: String,
    pub class_name: String,
    /// Payer name.
    pub name: String,
    pub school: SchoolDetails,
    pub payment_id: String,
    pub receipt_date: NaiveDate,
}

impl ReceiptRequest {
    /// Sum of quantity × unit price over every line.
    pub fn total(&self) -> CoreResult<Money> {
        self.lines.iter().try_fold(Money::zero(), |sum, line| {
            sum.checked_add(line.total()?)
                .ok_or_else(|| CoreError::overflow("Receipt total"))
        })
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the row fragments for all lines. `[index]` is 1-based.
pub fn render_rows(lines: &[ReceiptLine]) -> CoreResult<String> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let total = line.total()?;
            Ok(ROW_TEMPLATE
                .replacen("[index]", &(i + 1).to_string(), 1)
                .replacen("[name]", &escape_html(&line.name), 1)
                .replacen("[des]", &escape_html(&line.description), 1)
                .replacen("[count]", &line.quantity.to_string(), 1)
                .replacen("[unitPrice]", &line.unit_price.to_string(), 1)
                .replacen("[totalPrice]", &total.to_string(), 1))
        })
        .collect()
}

/// Fills `template` with the receipt's values.
///
/// Each placeholder is replaced at its first occurrence only. Placeholders
/// absent from the template are skipped. Fails with
/// [`CoreError::AmountOverflow`] when a total does not fit in `i64` cents.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use school_core::money::Money;
/// use school_core::receipt::{render_receipt, ReceiptLine, ReceiptRequest, SchoolDetails};
///
/// let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
/// let request = ReceiptRequest {
///     lines: vec![ReceiptLine {
///         name: "Tuition".into(),
///         description: String::new(),
///         quantity: 1,
///         unit_price: Money::from_major(30),
///     }],
///     due_date: date,
///     payment_mode: "Cash".into(),
///     address: "4 Lake View".into(),
///     class_name: "5A".into(),
///     name: "Meera".into(),
///     school: SchoolDetails {
///         name: "Green Valley".into(),
///         address: "12 Hill Road".into(),
///         phone: "9876543210".into(),
///         email: "office@gv.edu".into(),
///         logo: None,
///     },
///     payment_id: "PAY-1".into(),
///     receipt_date: date,
/// };
///
/// let html = render_receipt("Total: {total-amount}", &request).unwrap();
/// assert_eq!(html, "Total: 30.00");
/// ```
pub fn render_receipt(template: &str, request: &ReceiptRequest) -> CoreResult<String> {
    let rows = render_rows(&request.lines)?;
    let total = request.total()?;
    let school = &request.school;

    let values: [(&str, String); 14] = [
        ("{rows}", rows),
        ("{due-date}", request.due_date.format(DATE_FORMAT).to_string()),
        ("{payment-mode}", escape_html(&request.payment_mode)),
        ("{total-amount}", total.to_string()),
        ("{address}", escape_html(&request.address)),
        ("{class}", escape_html(&request.class_name)),
        ("{name}", escape_html(&request.name)),
        ("{school-name}", escape_html(&school.name)),
        ("{school-address}", escape_html(&school.address)),
        ("{school-phone}", escape_html(&school.phone)),
        ("{school-email}", escape_html(&school.email)),
        ("{school-logo}", escape_html(school.logo.as_deref().unwrap_or_default())),
        ("{receipt-date}", request.receipt_date.format(DATE_FORMAT).to_string()),
        ("{payment-id}", escape_html(&request.payment_id)),
    ];

    Ok(values
        .iter()
        .fold(template.to_string(), |html, (token, value)| html.replacen(token, value, 1)))
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> String {
        let mut html = String::from("<html><body><table>");
        for token in PAGE_PLACEHOLDERS {
            html.push_str(&format!("<p>{}</p>", token));
        }
        html.push_str("</table></body></html>");
        html
    }

    fn request() -> ReceiptRequest {
        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        ReceiptRequest {
            lines: vec![
                ReceiptLine {
                    name: "Tuition".into(),
                    description: "Term 2".into(),
                    quantity: 2,
                    unit_price: Money::from_major(50),
                },
                ReceiptLine {
                    name: "Library".into(),
                    description: String::new(),
                    quantity: 1,
                    unit_price: Money::from_major(30),
                },
            ],
            due_date: date,
            payment_mode: "Cash".into(),
            address: "4 Lake View".into(),
            class_name: "Grade 5 - A".into(),
            name: "Meera Shah".into(),
            school: SchoolDetails {
                name: "Green Valley High".into(),
                address: "12 Hill Road".into(),
                phone: "+919876543210".into(),
                email: "office@greenvalley.edu".into(),
                logo: Some("https://greenvalley.edu/logo.png".into()),
            },
            payment_id: "PAY-0042".into(),
            receipt_date: date,
        }
    }

    #[test]
    fn test_total_and_rows() {
        let request = request();
        assert_eq!(request.total().unwrap(), Money::from_major(130));

        let html = render_receipt(&page(), &request).unwrap();
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains("<td>1</td><td>Tuition</td><td>Term 2</td><td>2</td><td>50.00</td><td>100.00</td>"));
        assert!(html.contains("<td>2</td><td>Library</td>"));
        assert!(html.contains("<p>130.00</p>"));
        assert!(html.contains("<p>01-10-2024</p>"));
    }

    #[test]
    fn test_no_placeholder_left() {
        let html = render_receipt(&page(), &request()).unwrap();
        for token in PAGE_PLACEHOLDERS {
            assert!(!html.contains(token), "{} left in output", token);
        }
        assert!(!html.contains("[index]"));
    }

    #[test]
    fn test_each_token_replaced_once() {
        let html = render_receipt("{name}|{name}", &request()).unwrap();
        assert_eq!(html, "Meera Shah|{name}");
    }

    #[test]
    fn test_values_are_escaped() {
        let mut request = request();
        request.name = "<script>alert('x')</script>".into();
        request.lines[0].name = "Books & Uniform".into();

        let html = render_receipt(&page(), &request).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Books &amp; Uniform"));
    }

    #[test]
    fn test_missing_logo_renders_empty() {
        let mut request = request();
        request.school.logo = None;
        let html = render_receipt("<img src=\"{school-logo}\">", &request).unwrap();
        assert_eq!(html, "<img src=\"\">");
    }

    #[test]
    fn test_oversized_totals_fail_instead_of_wrapping() {
        let mut request = request();
        request.lines[0].quantity = 1_000_000_000_000_000;
        request.lines[0].unit_price = Money::from_major(100_000);

        assert!(matches!(request.lines[0].total(), Err(CoreError::AmountOverflow { .. })));
        assert!(render_rows(&request.lines).is_err());
        assert!(matches!(
            render_receipt(&page(), &request),
            Err(CoreError::AmountOverflow { .. })
        ));

        // Each line fits, the sum does not.
        let mut request = self::request();
        request.lines[0].quantity = 1;
        request.lines[0].unit_price = Money::from_cents(i64::MAX);
        assert!(request.lines[0].total().is_ok());
        assert!(matches!(request.total(), Err(CoreError::AmountOverflow { ref what }) if what == "Receipt total"));
    }
}
