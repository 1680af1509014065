//! # Attendance Regularization Repository
//!
//! Requests to correct a recorded attendance mark, and their review.
//!
//! ## Review Lifecycle
//! ```text
//! insert ──► pending ──review(approved)──► approved  (reviewed_at = now)
//!               ▲    └─review(rejected)──► rejected  (reviewed_at = now)
//!               └──────review(pending)─────┘         (reviewed_at = NULL)
//! ```
//!
//! `regularization_type` is written on insert and never by `update`.

use chrono::{DateTime, NaiveDate, Utc};
use school_core::contracts::attendance::{CreateRegularization, UpdateRegularization};
use school_core::query::DEFAULT_PAGE_SIZE;
use school_core::{AttendanceRegularization, ListFilter, RegularizationStatus, RegularizationType};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use super::page_bounds;
use crate::error::{DbError, DbResult};

const COLUMNS: &str = "id, attendance_id, student_id, class_id, date, reason, status, \
                       regularization_type, reviewed_at, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RegularizationRow {
    id: String,
    attendance_id: String,
    student_id: String,
    class_id: String,
    date: NaiveDate,
    reason: String,
    status: RegularizationStatus,
    regularization_type: RegularizationType,
    reviewed_at: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RegularizationRow> for AttendanceRegularization {
    fn from(row: RegularizationRow) -> Self {
        AttendanceRegularization {
            id: row.id,
            attendance_id: row.attendance_id,
            student_id: row.student_id,
            class_id: row.class_id,
            date: row.date,
            reason: row.reason,
            status: row.status,
            regularization_type: row.regularization_type,
            reviewed_at: row.reviewed_at,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for attendance regularization requests.
#[derive(Debug, Clone)]
pub struct RegularizationRepository {
    pool: SqlitePool,
    page_size: u32,
}

impl RegularizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RegularizationRepository {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Files a new request. Status starts as pending.
    pub async fn insert(&self, input: CreateRegularization) -> DbResult<AttendanceRegularization> {
        let request = AttendanceRegularization::new(input, Utc::now());
        debug!(
            id = %request.id,
            student_id = %request.student_id,
            date = %request.date,
            "Inserting regularization"
        );

        sqlx::query(
            r#"
            INSERT INTO attendance_regularizations (
                id, attendance_id, student_id, class_id, date, reason,
                status, regularization_type, reviewed_at,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&request.id)
        .bind(&request.attendance_id)
        .bind(&request.student_id)
        .bind(&request.class_id)
        .bind(request.date)
        .bind(&request.reason)
        .bind(request.status)
        .bind(request.regularization_type)
        .bind(request.reviewed_at)
        .bind(request.is_active)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(request)
    }

    /// Gets a request by its ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<AttendanceRegularization>> {
        let row = sqlx::query_as::<_, RegularizationRow>(&format!(
            "SELECT {} FROM attendance_regularizations WHERE id = ?1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AttendanceRegularization::from))
    }

    /// Lists active requests, newest first.
    pub async fn list(&self, filter: ListFilter) -> DbResult<Vec<AttendanceRegularization>> {
        let (limit, offset) = page_bounds(&filter, self.page_size);
        debug!(limit, offset, "Listing regularizations");

        let rows = sqlx::query_as::<_, RegularizationRow>(&format!(
            "SELECT {} FROM attendance_regularizations WHERE is_active = 1 \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendanceRegularization::from).collect())
    }

    /// Edits date and reason. A different `type` rejects the whole update.
    pub async fn update(
        &self,
        id: &str,
        changes: UpdateRegularization,
    ) -> DbResult<AttendanceRegularization> {
        debug!(id = %id, "Updating regularization");

        let mut tx = self.pool.begin().await?;
        let mut request = Self::fetch_for_write(&mut tx, id).await?;

        if let Err(err) = request.apply_update(changes, Utc::now()) {
            warn!(id = %id, error = %err, "Rejected regularization update");
            return Err(err.into());
        }

        sqlx::query(
            "UPDATE attendance_regularizations SET date = ?2, reason = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(&request.id)
        .bind(request.date)
        .bind(&request.reason)
        .bind(request.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Records a review decision.
    pub async fn review(
        &self,
        id: &str,
        status: RegularizationStatus,
    ) -> DbResult<AttendanceRegularization> {
        let mut tx = self.pool.begin().await?;
        let mut request = Self::fetch_for_write(&mut tx, id).await?;

        request.review(status, Utc::now());

        sqlx::query(
            "UPDATE attendance_regularizations SET status = ?2, reviewed_at = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(&request.id)
        .bind(request.status)
        .bind(request.reviewed_at)
        .bind(request.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id = %id, status = ?request.status, "Regularization reviewed");
        Ok(request)
    }

    /// Withdraws a request.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting regularization");

        let result = sqlx::query(
            "UPDATE attendance_regularizations SET is_active = 0, updated_at = ?2 \
             WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("AttendanceRegularization", id));
        }
        Ok(())
    }

    /// Number of active requests.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_regularizations WHERE is_active = 1",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Loads an active request inside a write transaction.
    async fn fetch_for_write(
        tx: &mut Transaction<'_, Sqlite>,
        id: &str,
    ) -> DbResult<AttendanceRegularization> {
        let row = sqlx::query_as::<_, RegularizationRow>(&format!(
            "SELECT {} FROM attendance_regularizations WHERE id = ?1 AND is_active = 1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(AttendanceRegularization::from)
            .ok_or_else(|| DbError::not_found("AttendanceRegularization", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use school_core::CoreError;

    fn request(reason: &str) -> CreateRegularization {
        CreateRegularization {
            attendance_id: fixtures::id(),
            student_id: fixtures::id(),
            class_id: fixtures::id(),
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            reason: reason.into(),
            regularization_type: RegularizationType::FullDay,
        }
    }

    #[tokio::test]
    async fn test_insert_defaults_to_pending() {
        let db = fixtures::database().await;
        let repo = db.regularizations();

        let created = repo.insert(request("Fever")).await.unwrap();
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.status, RegularizationStatus::Pending);
        assert_eq!(loaded.regularization_type, RegularizationType::FullDay);
        assert!(loaded.reviewed_at.is_none());
        assert_eq!(loaded.date, created.date);
    }

    #[tokio::test]
    async fn test_review_round_trip() {
        let db = fixtures::database().await;
        let repo = db.regularizations();
        let created = repo.insert(request("Fever")).await.unwrap();

        let approved = repo.review(&created.id, RegularizationStatus::Approved).await.unwrap();
        assert!(approved.reviewed_at.is_some());

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, RegularizationStatus::Approved);
        assert!(loaded.reviewed_at.is_some());

        let reopened = repo.review(&created.id, RegularizationStatus::Pending).await.unwrap();
        assert!(reopened.reviewed_at.is_none());
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert!(loaded.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn test_type_change_rejects_update() {
        let db = fixtures::database().await;
        let repo = db.regularizations();
        let created = repo.insert(request("Fever")).await.unwrap();

        let err = repo
            .update(
                &created.id,
                UpdateRegularization {
                    reason: Some("Dentist".into()),
                    regularization_type: Some(RegularizationType::HalfDay),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ImmutableField { .. })));

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.reason, "Fever");

        let updated = repo
            .update(
                &created.id,
                UpdateRegularization {
                    reason: Some("Dentist".into()),
                    regularization_type: Some(RegularizationType::FullDay),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.reason, "Dentist");
    }

    #[tokio::test]
    async fn test_withdrawn_request_cannot_be_reviewed() {
        let db = fixtures::database().await;
        let repo = db.regularizations();
        let created = repo.insert(request("Fever")).await.unwrap();
        repo.insert(request("Family event")).await.unwrap();

        repo.soft_delete(&created.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        let err = repo.review(&created.id, RegularizationStatus::Approved).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let listed = repo.list(ListFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].reason, "Family event");
    }
}
