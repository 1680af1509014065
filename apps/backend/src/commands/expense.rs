//! # Expense Commands
//!
//! Amounts travel as decimal numbers in major units (`1250.5`) and are
//! stored as integer minor units.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use super::accept;
use crate::error::ApiError;
use school_core::contracts::expense::{CreateExpense, UpdateExpense};
use school_core::{Expense, ListFilter, Money};
use school_db::Database;

pub async fn create_expense(db: &Database, body: &Value) -> Result<Expense, ApiError> {
    let input: CreateExpense = accept(body)?;
    let expense = db.expenses().insert(input).await?;
    info!(
        id = %expense.id,
        category = %expense.category,
        amount = %expense.amount,
        "Expense recorded"
    );
    Ok(expense)
}

pub async fn get_expense(db: &Database, id: &str) -> Result<Expense, ApiError> {
    db.expenses()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense", id))
}

pub async fn list_expenses(db: &Database, query: &Value) -> Result<Vec<Expense>, ApiError> {
    let filter = ListFilter::from_query(query)?;
    Ok(db.expenses().list(filter).await?)
}

/// Partial update; `updatedBy` records who made the change.
pub async fn update_expense(db: &Database, id: &str, body: &Value) -> Result<Expense, ApiError> {
    let changes: UpdateExpense = accept(body)?;
    Ok(db.expenses().update(id, changes).await?)
}

pub async fn delete_expense(db: &Database, id: &str) -> Result<(), ApiError> {
    db.expenses().soft_delete(id).await?;
    Ok(())
}

/// Total of a school's active expenses between two dates, inclusive.
pub async fn expense_total(
    db: &Database,
    school_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Money, ApiError> {
    Ok(db.expenses().total_for_school(school_id, from, to).await?)
}
