//! # Class Commands

use serde_json::Value;
use tracing::info;

use super::accept;
use crate::error::ApiError;
use school_core::contracts::class::{CreateClass, UpdateClass};
use school_core::{Class, ListFilter};
use school_db::Database;

pub async fn create_class(db: &Database, body: &Value) -> Result<Class, ApiError> {
    let input: CreateClass = accept(body)?;
    let class = db.classes().insert(input).await?;
    info!(id = %class.id, name = %class.class_name, subjects = class.subjects.len(), "Class created");
    Ok(class)
}

pub async fn get_class(db: &Database, id: &str) -> Result<Class, ApiError> {
    db.classes()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class", id))
}

pub async fn list_classes(db: &Database, query: &Value) -> Result<Vec<Class>, ApiError> {
    let filter = ListFilter::from_query(query)?;
    Ok(db.classes().list(filter).await?)
}

/// Every active class of one school, by name.
pub async fn list_school_classes(db: &Database, school_id: &str) -> Result<Vec<Class>, ApiError> {
    Ok(db.classes().list_by_school(school_id).await?)
}

/// Partial update; `subjects` replaces the whole set.
pub async fn update_class(db: &Database, id: &str, body: &Value) -> Result<Class, ApiError> {
    let changes: UpdateClass = accept(body)?;
    Ok(db.classes().update(id, changes).await?)
}

pub async fn delete_class(db: &Database, id: &str) -> Result<(), ApiError> {
    db.classes().soft_delete(id).await?;
    Ok(())
}
