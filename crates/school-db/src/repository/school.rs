//! # School Repository
//!
//! Database operations for schools. Schools are the target of the
//! `schoolId` existence checks done by the class test and semester exam
//! write paths.

use chrono::{DateTime, Utc};
use school_core::contracts::school::{CreateSchool, UpdateSchool};
use school_core::query::DEFAULT_PAGE_SIZE;
use school_core::{ListFilter, School};
use sqlx::SqlitePool;
use tracing::debug;

use super::{page_bounds, school_exists};
use crate::error::{DbError, DbResult};

const COLUMNS: &str = "id, name, address, phone, email, logo, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SchoolRow {
    id: String,
    name: String,
    address: String,
    phone: String,
    email: String,
    logo: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SchoolRow> for School {
    fn from(row: SchoolRow) -> Self {
        School {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            email: row.email,
            logo: row.logo,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for school database operations.
#[derive(Debug, Clone)]
pub struct SchoolRepository {
    pool: SqlitePool,
    page_size: u32,
}

impl SchoolRepository {
    /// Creates a new SchoolRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SchoolRepository {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the page size used when a list filter carries no `limit`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Inserts a new school.
    pub async fn insert(&self, input: CreateSchool) -> DbResult<School> {
        let school = School::new(input, Utc::now());
        debug!(id = %school.id, name = %school.name, "Inserting school");

        sqlx::query(
            r#"
            INSERT INTO schools (
                id, name, address, phone, email, logo,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&school.id)
        .bind(&school.name)
        .bind(&school.address)
        .bind(&school.phone)
        .bind(&school.email)
        .bind(&school.logo)
        .bind(school.is_active)
        .bind(school.created_at)
        .bind(school.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(school)
    }

    /// Gets a school by its ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<School>> {
        let row = sqlx::query_as::<_, SchoolRow>(&format!(
            "SELECT {} FROM schools WHERE id = ?1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(School::from))
    }

    /// Returns true when an active school with this ID exists.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        school_exists(&self.pool, id).await
    }

    /// Lists active schools, newest first.
    pub async fn list(&self, filter: ListFilter) -> DbResult<Vec<School>> {
        let (limit, offset) = page_bounds(&filter, self.page_size);
        debug!(limit, offset, "Listing schools");

        let rows = sqlx::query_as::<_, SchoolRow>(&format!(
            "SELECT {} FROM schools WHERE is_active = 1 \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(School::from).collect())
    }

    /// Applies a partial update.
    ///
    /// ## Returns
    /// * `Ok(School)` - The updated school
    /// * `Err(DbError::NotFound)` - No active school with this ID
    pub async fn update(&self, id: &str, changes: UpdateSchool) -> DbResult<School> {
        debug!(id = %id, "Updating school");

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SchoolRow>(&format!(
            "SELECT {} FROM schools WHERE id = ?1 AND is_active = 1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut school = row
            .map(School::from)
            .ok_or_else(|| DbError::not_found("School", id))?;

        school.apply_update(changes, Utc::now());

        sqlx::query(
            r#"
            UPDATE schools SET
                name = ?2,
                address = ?3,
                phone = ?4,
                email = ?5,
                logo = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&school.id)
        .bind(&school.name)
        .bind(&school.address)
        .bind(&school.phone)
        .bind(&school.email)
        .bind(&school.logo)
        .bind(school.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(school)
    }

    /// Marks a school inactive. It no longer satisfies existence checks.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting school");

        let result = sqlx::query(
            "UPDATE schools SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("School", id));
        }
        Ok(())
    }

    /// Number of active schools.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schools WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;

    #[tokio::test]
    async fn test_insert_and_exists() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;

        let repo = db.schools();
        assert!(repo.exists(&school.id).await.unwrap());
        assert!(!repo.exists(fixtures::MISSING).await.unwrap());

        let loaded = repo.get_by_id(&school.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Green Valley High");
        assert!(loaded.is_active);
    }

    #[tokio::test]
    async fn test_update_and_soft_delete() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;
        let repo = db.schools();

        let updated = repo
            .update(
                &school.id,
                UpdateSchool {
                    logo: Some("https://greenvalley.edu/logo.png".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.logo.as_deref(), Some("https://greenvalley.edu/logo.png"));
        assert_eq!(updated.name, school.name);

        repo.soft_delete(&school.id).await.unwrap();
        assert!(!repo.exists(&school.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.list(ListFilter::default()).await.unwrap().is_empty());

        let err = repo.soft_delete(&school.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.update(&school.id, UpdateSchool::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_school() {
        let db = fixtures::database().await;
        let err = db
            .schools()
            .update(fixtures::MISSING, UpdateSchool::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
