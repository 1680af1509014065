//! # Semester Exam Commands
//!
//! A semester exam is one timetable per class: an ordered list of papers,
//! each with subject, date and a start/end time. Papers belong to the exam
//! and are replaced as a whole on update.

use serde_json::Value;
use tracing::info;

use super::accept;
use crate::error::ApiError;
use school_core::contracts::exam::{CreateSemExam, UpdateSemExam};
use school_core::{ListFilter, SemExam};
use school_db::Database;

/// Creates a semester exam. The school must exist and be active.
pub async fn create_sem_exam(db: &Database, body: &Value) -> Result<SemExam, ApiError> {
    let input: CreateSemExam = accept(body)?;
    let exam = db.sem_exams().insert(input).await?;
    info!(id = %exam.id, class_id = %exam.class_id, papers = exam.exams.len(), "Semester exam created");
    Ok(exam)
}

pub async fn get_sem_exam(db: &Database, id: &str) -> Result<SemExam, ApiError> {
    db.sem_exams()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("SemExam", id))
}

pub async fn list_sem_exams(db: &Database, query: &Value) -> Result<Vec<SemExam>, ApiError> {
    let filter = ListFilter::from_query(query)?;
    Ok(db.sem_exams().list(filter).await?)
}

pub async fn update_sem_exam(db: &Database, id: &str, body: &Value) -> Result<SemExam, ApiError> {
    let changes: UpdateSemExam = accept(body)?;
    Ok(db.sem_exams().update(id, changes).await?)
}

pub async fn delete_sem_exam(db: &Database, id: &str) -> Result<(), ApiError> {
    db.sem_exams().soft_delete(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::commands::school::create_school;
    use crate::error::ErrorCode;
    use chrono::NaiveTime;
    use serde_json::json;

    fn paper(date: &str, start: &str, end: &str) -> Value {
        json!({ "subjectId": fixtures::uuid(), "date": date, "startTime": start, "endTime": end })
    }

    fn body(school_id: &str, class_id: &str) -> Value {
        json!({
            "schoolId": school_id,
            "classId": class_id,
            "exams": [
                paper("2024-11-04", "09:30", "12:30"),
                paper("2024-11-06", "09:30:00", "11:00:00")
            ]
        })
    }

    #[tokio::test]
    async fn test_create_keeps_paper_order() {
        let db = fixtures::database().await;
        let school = create_school(&db, &fixtures::school_body()).await.unwrap();

        let exam = create_sem_exam(&db, &body(&school.id, &fixtures::uuid())).await.unwrap();
        assert_eq!(exam.exams.len(), 2);
        assert_eq!(exam.exams[0].start_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(exam.exams[1].date.to_string(), "2024-11-06");

        let stored = get_sem_exam(&db, &exam.id).await.unwrap();
        assert_eq!(stored.exams, exam.exams);
    }

    #[tokio::test]
    async fn test_paper_errors_carry_their_path() {
        let db = fixtures::database().await;
        let mut payload = body(&fixtures::uuid(), &fixtures::uuid());
        payload["exams"][1]["startTime"] = json!("9.30am");

        let err = create_sem_exam(&db, &payload).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.details[0].field, "exams[1].startTime");
    }

    #[tokio::test]
    async fn test_paper_must_end_after_it_starts() {
        let db = fixtures::database().await;
        let mut payload = body(&fixtures::uuid(), &fixtures::uuid());
        payload["exams"][0]["endTime"] = json!("09:00");

        let err = create_sem_exam(&db, &payload).await.unwrap_err();
        assert_eq!(err.details[0].field, "exams");
    }

    #[tokio::test]
    async fn test_unknown_school_and_immutable_ids() {
        let db = fixtures::database().await;

        let err = create_sem_exam(&db, &body(&fixtures::uuid(), &fixtures::uuid()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReferenceNotFound);
        assert_eq!(db.sem_exams().count().await.unwrap(), 0);

        let school = create_school(&db, &fixtures::school_body()).await.unwrap();
        let exam = create_sem_exam(&db, &body(&school.id, &fixtures::uuid())).await.unwrap();

        let err = update_sem_exam(
            &db,
            &exam.id,
            &json!({ "schoolId": fixtures::uuid(), "exams": [paper("2024-12-01", "10:00", "12:00")] }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImmutableField);
        assert_eq!(get_sem_exam(&db, &exam.id).await.unwrap().exams.len(), 2);

        delete_sem_exam(&db, &exam.id).await.unwrap();
        assert!(list_sem_exams(&db, &json!({})).await.unwrap().is_empty());
    }
}
