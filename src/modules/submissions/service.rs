use chrono::{DateTime, Utc};
use edudesk_core::errors::{is_foreign_key_violation, map_unique_violation};
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::submissions::{
    CreateSubmissionDto, GradeSubmissionDto, PaginatedSubmissionsResponse, SUBMISSION_COLUMNS,
    Submission, SubmissionFilterParams, SubmissionStatus, UpdateSubmissionDto, check_has_body,
};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::scope::StudentScope;

#[derive(FromRow)]
struct AssignmentTerms {
    due_date: DateTime<Utc>,
    max_marks: f64,
}

async fn assignment_terms(db: &PgPool, assignment_id: Uuid) -> Result<AssignmentTerms, AppError> {
    sqlx::query_as::<_, AssignmentTerms>(
        "SELECT due_date, max_marks FROM assignments WHERE id = $1",
    )
    .bind(assignment_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Assignment not found")))
}

pub fn check_grade(marks: f64, max_marks: f64) -> Result<(), AppError> {
    if marks > max_marks {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "marks cannot exceed the assignment's max_marks ({})",
            max_marks
        )));
    }
    Ok(())
}

pub struct SubmissionService;

impl SubmissionService {
    /// Records a submission for `student_id`, marking it late when it arrives
    /// after the assignment's due date.
    #[instrument(skip(db, dto), fields(assignment_id = %dto.assignment_id))]
    pub async fn create_submission(
        db: &PgPool,
        student_id: Uuid,
        dto: CreateSubmissionDto,
    ) -> Result<Submission, AppError> {
        let terms = assignment_terms(db, dto.assignment_id).await?;
        let submitted_at = Utc::now();
        let status = SubmissionStatus::on_submit(submitted_at, terms.due_date);

        let submission = sqlx::query_as::<_, Submission>(&format!(
            r#"INSERT INTO submissions
                   (assignment_id, student_id, content, file_url, submitted_at, status)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {}"#,
            SUBMISSION_COLUMNS
        ))
        .bind(dto.assignment_id)
        .bind(student_id)
        .bind(&dto.content)
        .bind(&dto.file_url)
        .bind(submitted_at)
        .bind(status)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::bad_request(anyhow::anyhow!("Student not found"));
            }
            map_unique_violation(e, "This student has already submitted this assignment")
        })?;

        Ok(submission)
    }

    #[instrument(skip(db, scope))]
    pub async fn get_submissions(
        db: &PgPool,
        scope: &StudentScope,
        filters: SubmissionFilterParams,
    ) -> Result<PaginatedSubmissionsResponse, AppError> {
        let allowed = scope.ids();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM submissions
               WHERE ($1::uuid IS NULL OR assignment_id = $1)
                 AND ($2::uuid IS NULL OR student_id = $2)
                 AND ($3::submission_status IS NULL OR status = $3)
                 AND ($4::uuid[] IS NULL OR student_id = ANY($4))"#,
        )
        .bind(filters.assignment_id)
        .bind(filters.student_id)
        .bind(filters.status)
        .bind(&allowed)
        .fetch_one(db)
        .await?;

        let submissions = sqlx::query_as::<_, Submission>(&format!(
            r#"SELECT {} FROM submissions
               WHERE ($1::uuid IS NULL OR assignment_id = $1)
                 AND ($2::uuid IS NULL OR student_id = $2)
                 AND ($3::submission_status IS NULL OR status = $3)
                 AND ($4::uuid[] IS NULL OR student_id = ANY($4))
               ORDER BY submitted_at DESC
               LIMIT $5 OFFSET $6"#,
            SUBMISSION_COLUMNS
        ))
        .bind(filters.assignment_id)
        .bind(filters.student_id)
        .bind(filters.status)
        .bind(&allowed)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedSubmissionsResponse {
            data: submissions,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_submission(db: &PgPool, id: Uuid) -> Result<Submission, AppError> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {} FROM submissions WHERE id = $1",
            SUBMISSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Submission not found")))
    }

    /// Content can change until the submission has been graded or returned.
    #[instrument(skip(db, existing, dto), fields(submission_id = %existing.id))]
    pub async fn update_submission(
        db: &PgPool,
        existing: Submission,
        dto: UpdateSubmissionDto,
    ) -> Result<Submission, AppError> {
        if existing.status.is_final() {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Graded submissions cannot be changed"
            )));
        }

        let content = dto.content.or(existing.content);
        let file_url = dto.file_url.or(existing.file_url);
        check_has_body(content.as_deref(), file_url.as_deref()).map_err(|e| {
            AppError::unprocessable(anyhow::anyhow!("{}", e.message.unwrap_or_default()))
        })?;

        let submission = sqlx::query_as::<_, Submission>(&format!(
            r#"UPDATE submissions
               SET content = $1, file_url = $2, updated_at = NOW()
               WHERE id = $3 AND status NOT IN ('graded', 'returned')
               RETURNING {}"#,
            SUBMISSION_COLUMNS
        ))
        .bind(&content)
        .bind(&file_url)
        .bind(existing.id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::conflict(anyhow::anyhow!("Graded submissions cannot be changed"))
        })?;

        Ok(submission)
    }

    #[instrument(skip(db, dto), fields(marks = dto.marks))]
    pub async fn grade_submission(
        db: &PgPool,
        id: Uuid,
        graded_by: Uuid,
        dto: GradeSubmissionDto,
    ) -> Result<Submission, AppError> {
        let existing = Self::get_submission(db, id).await?;
        let terms = assignment_terms(db, existing.assignment_id).await?;
        check_grade(dto.marks, terms.max_marks)?;

        let submission = sqlx::query_as::<_, Submission>(&format!(
            r#"UPDATE submissions
               SET marks = $1, feedback = $2, graded_by = $3, status = 'graded',
                   updated_at = NOW()
               WHERE id = $4
               RETURNING {}"#,
            SUBMISSION_COLUMNS
        ))
        .bind(dto.marks)
        .bind(&dto.feedback)
        .bind(graded_by)
        .bind(id)
        .fetch_one(db)
        .await?;

        tracing::info!(submission_id = %id, "Submission graded");
        Ok(submission)
    }

    #[instrument(skip(db))]
    pub async fn delete_submission(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Submission not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_grade_within_max_marks() {
        assert!(check_grade(50.0, 50.0).is_ok());
        assert!(check_grade(0.0, 50.0).is_ok());
        assert_eq!(
            check_grade(50.5, 50.0).unwrap_err().status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
