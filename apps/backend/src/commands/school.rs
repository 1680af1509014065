//! # School Commands
//!
//! Schools are the target of the `schoolId` existence checks on class tests
//! and semester exams, and supply the letterhead of every receipt.

use serde_json::Value;
use tracing::{debug, info};

use super::accept;
use crate::error::ApiError;
use school_core::contracts::school::{CreateSchool, UpdateSchool};
use school_core::{ListFilter, School};
use school_db::Database;

pub async fn create_school(db: &Database, body: &Value) -> Result<School, ApiError> {
    let input: CreateSchool = accept(body)?;
    let school = db.schools().insert(input).await?;
    info!(id = %school.id, name = %school.name, "School created");
    Ok(school)
}

/// Gets a school by id, including deactivated ones.
pub async fn get_school(db: &Database, id: &str) -> Result<School, ApiError> {
    debug!(id = %id, "get_school command");
    db.schools()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("School", id))
}

/// Lists active schools. `query` may carry `page` and `limit`; every other
/// key is ignored.
pub async fn list_schools(db: &Database, query: &Value) -> Result<Vec<School>, ApiError> {
    let filter = ListFilter::from_query(query)?;
    Ok(db.schools().list(filter).await?)
}

pub async fn update_school(db: &Database, id: &str, body: &Value) -> Result<School, ApiError> {
    let changes: UpdateSchool = accept(body)?;
    Ok(db.schools().update(id, changes).await?)
}

/// Deactivates a school. Later class tests and semester exams naming it
/// fail the existence check.
pub async fn delete_school(db: &Database, id: &str) -> Result<(), ApiError> {
    db.schools().soft_delete(id).await?;
    info!(id = %id, "School deactivated");
    Ok(())
}
