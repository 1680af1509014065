//! # Expense Repository
//!
//! School expenses. Amounts are stored as integer minor units in
//! `amount_cents`; the table's CHECK constraint backs up the contract's
//! non-negative rule.

use chrono::{DateTime, NaiveDate, Utc};
use school_core::contracts::expense::{CreateExpense, UpdateExpense};
use school_core::query::DEFAULT_PAGE_SIZE;
use school_core::{Expense, ListFilter, Money};
use sqlx::SqlitePool;
use tracing::debug;

use super::page_bounds;
use crate::error::{DbError, DbResult};

const COLUMNS: &str = "id, description, amount_cents, date, school_id, category, created_by, \
                       updated_by, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    description: String,
    amount_cents: i64,
    date: NaiveDate,
    school_id: String,
    category: String,
    created_by: String,
    updated_by: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Expense {
            id: row.id,
            description: row.description,
            amount: Money::from_cents(row.amount_cents),
            date: row.date,
            school_id: row.school_id,
            category: row.category,
            created_by: row.created_by,
            updated_by: row.updated_by,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
    page_size: u32,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Records a new expense.
    ///
    /// ## Returns
    /// * `Err(DbError::ConstraintViolation)` - negative amount reached the
    ///   store (the contract normally rejects it first)
    pub async fn insert(&self, input: CreateExpense) -> DbResult<Expense> {
        let expense = Expense::new(input, Utc::now());
        debug!(
            id = %expense.id,
            school_id = %expense.school_id,
            amount_cents = expense.amount.cents(),
            "Inserting expense"
        );

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, description, amount_cents, date, school_id, category,
                created_by, updated_by, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.description)
        .bind(expense.amount.cents())
        .bind(expense.date)
        .bind(&expense.school_id)
        .bind(&expense.category)
        .bind(&expense.created_by)
        .bind(&expense.updated_by)
        .bind(expense.is_active)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!("SELECT {} FROM expenses WHERE id = ?1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Expense::from))
    }

    /// Lists active expenses, newest first.
    pub async fn list(&self, filter: ListFilter) -> DbResult<Vec<Expense>> {
        let (limit, offset) = page_bounds(&filter, self.page_size);
        debug!(limit, offset, "Listing expenses");

        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {} FROM expenses WHERE is_active = 1 \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Sum of active expenses for a school within `[from, to]`.
    pub async fn total_for_school(&self, school_id: &str, from: NaiveDate, to: NaiveDate) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses \
             WHERE school_id = ?1 AND is_active = 1 AND date BETWEEN ?2 AND ?3",
        )
        .bind(school_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    pub async fn update(&self, id: &str, changes: UpdateExpense) -> DbResult<Expense> {
        debug!(id = %id, updated_by = ?changes.updated_by, "Updating expense");

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {} FROM expenses WHERE id = ?1 AND is_active = 1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut expense = row
            .map(Expense::from)
            .ok_or_else(|| DbError::not_found("Expense", id))?;

        expense.apply_update(changes, Utc::now());

        sqlx::query(
            r#"
            UPDATE expenses SET
                description = ?2,
                amount_cents = ?3,
                date = ?4,
                school_id = ?5,
                category = ?6,
                created_by = ?7,
                updated_by = ?8,
                is_active = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.description)
        .bind(expense.amount.cents())
        .bind(expense.date)
        .bind(&expense.school_id)
        .bind(&expense.category)
        .bind(&expense.created_by)
        .bind(&expense.updated_by)
        .bind(expense.is_active)
        .bind(expense.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(expense)
    }

    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting expense");

        let result = sqlx::query(
            "UPDATE expenses SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;

    fn input(school_id: &str, cents: i64, day: u32) -> CreateExpense {
        CreateExpense {
            description: "Chalk and dusters".into(),
            amount: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            school_id: school_id.into(),
            category: "Stationery".into(),
            created_by: fixtures::id(),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_amount_round_trip() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;

        let created = db.expenses().insert(input(&school.id, 34999, 1)).await.unwrap();
        let loaded = db.expenses().get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.amount, Money::from_cents(34999));
        assert!(loaded.updated_by.is_none());
    }

    #[tokio::test]
    async fn test_negative_amount_hits_check_constraint() {
        let db = fixtures::database().await;
        let err = db.expenses().insert(input(&fixtures::id(), -1, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
        assert_eq!(db.expenses().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_records_editor() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;
        let created = db.expenses().insert(input(&school.id, 1000, 1)).await.unwrap();
        let editor = fixtures::id();

        let updated = db
            .expenses()
            .update(
                &created.id,
                UpdateExpense {
                    amount: Some(Money::from_cents(1250)),
                    updated_by: Some(editor.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.amount.cents(), 1250);
        assert_eq!(updated.updated_by.as_deref(), Some(editor.as_str()));
        assert_eq!(updated.created_by, created.created_by);
    }

    #[tokio::test]
    async fn test_deleted_expense_is_read_only() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;
        let created = db.expenses().insert(input(&school.id, 1000, 1)).await.unwrap();
        db.expenses().soft_delete(&created.id).await.unwrap();

        let err = db
            .expenses()
            .update(
                &created.id,
                UpdateExpense {
                    amount: Some(Money::from_cents(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let stored = db.expenses().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.amount.cents(), 1000);
    }

    #[tokio::test]
    async fn test_total_for_school() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;
        let repo = db.expenses();

        repo.insert(input(&school.id, 1000, 1)).await.unwrap();
        repo.insert(input(&school.id, 2550, 15)).await.unwrap();
        let dropped = repo.insert(input(&school.id, 9999, 20)).await.unwrap();
        repo.insert(input(&fixtures::id(), 500, 2)).await.unwrap();
        repo.soft_delete(&dropped.id).await.unwrap();

        let from = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        let total = repo.total_for_school(&school.id, from, to).await.unwrap();
        assert_eq!(total, Money::from_cents(3550));
    }
}
