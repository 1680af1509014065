//! # Receipt Commands
//!
//! ## Generation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  body ──► GenerateReceipt contract                                     │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  schools.get_by_id(schoolId) ──► missing / inactive ──► NOT_FOUND      │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  <asset dir>/receipt.html ──► unreadable ──► RESOURCE_UNAVAILABLE      │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  render_receipt(template, request) ──► HTML string                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The receipt date is the day of generation (UTC).

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::info;

use super::accept;
use crate::assets::ReceiptAssets;
use crate::error::ApiError;
use school_core::contracts::receipt::GenerateReceipt;
use school_core::receipt::{render_receipt, SchoolDetails};
use school_db::Database;

/// Renders a fee receipt for today.
pub async fn generate_receipt(
    db: &Database,
    assets: &ReceiptAssets,
    body: &Value,
) -> Result<String, ApiError> {
    generate_receipt_on(db, assets, body, Utc::now().date_naive()).await
}

/// Renders a fee receipt dated `receipt_date`.
pub async fn generate_receipt_on(
    db: &Database,
    assets: &ReceiptAssets,
    body: &Value,
    receipt_date: NaiveDate,
) -> Result<String, ApiError> {
    let input: GenerateReceipt = accept(body)?;

    let school = db
        .schools()
        .get_by_id(&input.school_id)
        .await?
        .filter(|school| school.is_active)
        .ok_or_else(|| ApiError::not_found("School", &input.school_id))?;

    let template = assets.template().await?;
    let request = input.into_request(SchoolDetails::from(school), receipt_date);
    let html = render_receipt(&template, &request)?;

    info!(
        payment_id = %request.payment_id,
        lines = request.lines.len(),
        "Receipt generated"
    );
    Ok(html)
}
