//! # Semester Exam Repository
//!
//! Semester exams with their embedded timetable. The `exams` entries are
//! owned by the row and stored as a JSON array; they have no table or
//! identity of their own.
//!
//! Same write rules as class tests: `schoolId` must name an active school
//! at insert time, and `schoolId` / `classId` never change afterwards.

use chrono::{DateTime, Utc};
use school_core::contracts::exam::{CreateSemExam, UpdateSemExam};
use school_core::query::DEFAULT_PAGE_SIZE;
use school_core::{ListFilter, SemExam};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::{decode_json, encode_json, page_bounds, school_exists};
use crate::error::{DbError, DbResult};

const COLUMNS: &str = "id, school_id, class_id, exams, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SemExamRow {
    id: String,
    school_id: String,
    class_id: String,
    exams: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SemExamRow> for SemExam {
    type Error = DbError;

    fn try_from(row: SemExamRow) -> DbResult<Self> {
        Ok(SemExam {
            exams: decode_json("exams", &row.exams)?,
            id: row.id,
            school_id: row.school_id,
            class_id: row.class_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for semester exam database operations.
#[derive(Debug, Clone)]
pub struct SemExamRepository {
    pool: SqlitePool,
    page_size: u32,
}

impl SemExamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SemExamRepository {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Inserts a semester exam after confirming its school exists.
    ///
    /// ## Returns
    /// * `Err(DbError::ReferenceNotFound)` - unknown `schoolId`; nothing
    ///   was written
    pub async fn insert(&self, input: CreateSemExam) -> DbResult<SemExam> {
        let exam = SemExam::new(input, Utc::now());
        debug!(
            id = %exam.id,
            school_id = %exam.school_id,
            papers = exam.exams.len(),
            "Inserting semester exam"
        );

        let exams = encode_json("exams", &exam.exams)?;
        let mut tx = self.pool.begin().await?;

        if !school_exists(&mut *tx, &exam.school_id).await? {
            warn!(school_id = %exam.school_id, "Semester exam rejected: unknown school");
            return Err(DbError::missing_reference("SemExam", "schoolId", &exam.school_id));
        }

        sqlx::query(
            r#"
            INSERT INTO sem_exams (
                id, school_id, class_id, exams, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&exam.id)
        .bind(&exam.school_id)
        .bind(&exam.class_id)
        .bind(exams)
        .bind(exam.is_active)
        .bind(exam.created_at)
        .bind(exam.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(exam)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SemExam>> {
        let row = sqlx::query_as::<_, SemExamRow>(&format!("SELECT {} FROM sem_exams WHERE id = ?1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(SemExam::try_from).transpose()
    }

    /// Lists active semester exams, newest first.
    pub async fn list(&self, filter: ListFilter) -> DbResult<Vec<SemExam>> {
        let (limit, offset) = page_bounds(&filter, self.page_size);
        debug!(limit, offset, "Listing semester exams");

        let rows = sqlx::query_as::<_, SemExamRow>(&format!(
            "SELECT {} FROM sem_exams WHERE is_active = 1 \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SemExam::try_from).collect()
    }

    /// Applies a partial update; `exams` replaces the whole timetable.
    ///
    /// A `schoolId` or `classId` that differs from the stored one rejects
    /// the whole update.
    pub async fn update(&self, id: &str, changes: UpdateSemExam) -> DbResult<SemExam> {
        debug!(id = %id, "Updating semester exam");

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SemExamRow>(&format!(
            "SELECT {} FROM sem_exams WHERE id = ?1 AND is_active = 1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut exam = row
            .map(SemExam::try_from)
            .transpose()?
            .ok_or_else(|| DbError::not_found("SemExam", id))?;

        if let Err(err) = exam.apply_update(changes, Utc::now()) {
            warn!(id = %id, error = %err, "Rejected semester exam update");
            return Err(err.into());
        }

        sqlx::query("UPDATE sem_exams SET exams = ?2, is_active = ?3, updated_at = ?4 WHERE id = ?1")
            .bind(&exam.id)
            .bind(encode_json("exams", &exam.exams)?)
            .bind(exam.is_active)
            .bind(exam.updated_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(exam)
    }

    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting semester exam");

        let result = sqlx::query(
            "UPDATE sem_exams SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SemExam", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sem_exams WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
