//! # Attendance Regularization Commands
//!
//! ## Request Lifecycle
//! ```text
//! submit ──► pending ──review──► approved / rejected
//!               ▲                       │
//!               └──────review(pending)──┘   (reviewedAt cleared)
//! ```
//!
//! `type` (full day / half day) is fixed once submitted.

use serde_json::Value;
use tracing::info;

use super::accept;
use crate::error::ApiError;
use school_core::contracts::attendance::{
    CreateRegularization, ReviewRegularization, UpdateRegularization,
};
use school_core::{AttendanceRegularization, ListFilter};
use school_db::Database;

pub async fn submit_regularization(
    db: &Database,
    body: &Value,
) -> Result<AttendanceRegularization, ApiError> {
    let input: CreateRegularization = accept(body)?;
    let request = db.regularizations().insert(input).await?;
    info!(id = %request.id, student_id = %request.student_id, "Regularization submitted");
    Ok(request)
}

pub async fn get_regularization(db: &Database, id: &str) -> Result<AttendanceRegularization, ApiError> {
    db.regularizations()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("AttendanceRegularization", id))
}

pub async fn list_regularizations(
    db: &Database,
    query: &Value,
) -> Result<Vec<AttendanceRegularization>, ApiError> {
    let filter = ListFilter::from_query(query)?;
    Ok(db.regularizations().list(filter).await?)
}

/// Edits date or reason. Sending a different `type` rejects the whole edit.
pub async fn update_regularization(
    db: &Database,
    id: &str,
    body: &Value,
) -> Result<AttendanceRegularization, ApiError> {
    let changes: UpdateRegularization = accept(body)?;
    Ok(db.regularizations().update(id, changes).await?)
}

pub async fn review_regularization(
    db: &Database,
    id: &str,
    body: &Value,
) -> Result<AttendanceRegularization, ApiError> {
    let decision: ReviewRegularization = accept(body)?;
    Ok(db.regularizations().review(id, decision.status).await?)
}

pub async fn withdraw_regularization(db: &Database, id: &str) -> Result<(), ApiError> {
    db.regularizations().soft_delete(id).await?;
    Ok(())
}
