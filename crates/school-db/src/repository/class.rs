//! # Class Repository
//!
//! Classes with their subject sets. `subjects` is stored as a JSON array in
//! a TEXT column; the contract guarantees it is never empty.

use chrono::{DateTime, Utc};
use school_core::contracts::class::{CreateClass, UpdateClass};
use school_core::query::DEFAULT_PAGE_SIZE;
use school_core::{Class, ListFilter};
use sqlx::SqlitePool;
use tracing::debug;

use super::{decode_json, encode_json, page_bounds};
use crate::error::{DbError, DbResult};

const COLUMNS: &str =
    "id, class_name, class_room, school_id, class_teacher_id, subjects, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ClassRow {
    id: String,
    class_name: String,
    class_room: Option<String>,
    school_id: String,
    class_teacher_id: String,
    subjects: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClassRow> for Class {
    type Error = DbError;

    fn try_from(row: ClassRow) -> DbResult<Self> {
        Ok(Class {
            subjects: decode_json("subjects", &row.subjects)?,
            id: row.id,
            class_name: row.class_name,
            class_room: row.class_room,
            school_id: row.school_id,
            class_teacher_id: row.class_teacher_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for class database operations.
#[derive(Debug, Clone)]
pub struct ClassRepository {
    pool: SqlitePool,
    page_size: u32,
}

impl ClassRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClassRepository {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub async fn insert(&self, input: CreateClass) -> DbResult<Class> {
        let class = Class::new(input, Utc::now());
        debug!(id = %class.id, class_name = %class.class_name, "Inserting class");

        sqlx::query(
            r#"
            INSERT INTO classes (
                id, class_name, class_room, school_id, class_teacher_id,
                subjects, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&class.id)
        .bind(&class.class_name)
        .bind(&class.class_room)
        .bind(&class.school_id)
        .bind(&class.class_teacher_id)
        .bind(encode_json("subjects", &class.subjects)?)
        .bind(class.is_active)
        .bind(class.created_at)
        .bind(class.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(class)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Class>> {
        let row = sqlx::query_as::<_, ClassRow>(&format!("SELECT {} FROM classes WHERE id = ?1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Class::try_from).transpose()
    }

    /// Lists active classes, newest first.
    pub async fn list(&self, filter: ListFilter) -> DbResult<Vec<Class>> {
        let (limit, offset) = page_bounds(&filter, self.page_size);
        debug!(limit, offset, "Listing classes");

        let rows = sqlx::query_as::<_, ClassRow>(&format!(
            "SELECT {} FROM classes WHERE is_active = 1 \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Class::try_from).collect()
    }

    /// Lists the active classes of one school, by name.
    pub async fn list_by_school(&self, school_id: &str) -> DbResult<Vec<Class>> {
        let rows = sqlx::query_as::<_, ClassRow>(&format!(
            "SELECT {} FROM classes WHERE school_id = ?1 AND is_active = 1 ORDER BY class_name",
            COLUMNS
        ))
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Class::try_from).collect()
    }

    pub async fn update(&self, id: &str, changes: UpdateClass) -> DbResult<Class> {
        debug!(id = %id, "Updating class");

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ClassRow>(&format!(
            "SELECT {} FROM classes WHERE id = ?1 AND is_active = 1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut class = row
            .map(Class::try_from)
            .transpose()?
            .ok_or_else(|| DbError::not_found("Class", id))?;

        class.apply_update(changes, Utc::now());

        sqlx::query(
            r#"
            UPDATE classes SET
                class_name = ?2,
                class_room = ?3,
                school_id = ?4,
                class_teacher_id = ?5,
                subjects = ?6,
                is_active = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&class.id)
        .bind(&class.class_name)
        .bind(&class.class_room)
        .bind(&class.school_id)
        .bind(&class.class_teacher_id)
        .bind(encode_json("subjects", &class.subjects)?)
        .bind(class.is_active)
        .bind(class.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(class)
    }

    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting class");

        let result = sqlx::query(
            "UPDATE classes SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Class", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;

    fn class(school_id: &str, name: &str, subjects: Vec<String>) -> CreateClass {
        CreateClass {
            class_name: name.into(),
            class_room: Some("B-12".into()),
            school_id: school_id.into(),
            class_teacher_id: fixtures::id(),
            subjects,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_subjects_survive_storage() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;
        let subjects = vec![fixtures::id(), fixtures::id(), fixtures::id()];

        let created = db.classes().insert(class(&school.id, "5A", subjects.clone())).await.unwrap();
        let loaded = db.classes().get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.subjects, subjects);
        assert_eq!(loaded.class_room.as_deref(), Some("B-12"));
        assert!(loaded.is_active);
    }

    #[tokio::test]
    async fn test_update_replaces_subjects() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;
        let created = db
            .classes()
            .insert(class(&school.id, "5A", vec![fixtures::id()]))
            .await
            .unwrap();

        let replacement = vec![fixtures::id(), fixtures::id()];
        let updated = db
            .classes()
            .update(
                &created.id,
                UpdateClass {
                    subjects: Some(replacement.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.subjects, replacement);
        assert_eq!(updated.class_name, "5A");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_list_by_school_skips_inactive() {
        let db = fixtures::database().await;
        let school = fixtures::school(&db).await;
        let repo = db.classes();

        let b = repo.insert(class(&school.id, "5B", vec![fixtures::id()])).await.unwrap();
        repo.insert(class(&school.id, "5A", vec![fixtures::id()])).await.unwrap();
        repo.insert(class(&fixtures::id(), "9C", vec![fixtures::id()])).await.unwrap();
        repo.soft_delete(&b.id).await.unwrap();

        let names: Vec<String> = repo
            .list_by_school(&school.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.class_name)
            .collect();
        assert_eq!(names, vec!["5A"]);
        assert_eq!(repo.count().await.unwrap(), 2);

        let err = repo.update(&b.id, UpdateClass::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
