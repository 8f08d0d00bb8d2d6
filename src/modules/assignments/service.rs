use edudesk_core::errors::is_foreign_key_violation;
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::assignments::{
    ASSIGNMENT_COLUMNS, Assignment, AssignmentFilterParams, CreateAssignmentDto, DEFAULT_MAX_MARKS,
    PaginatedAssignmentsResponse, UpdateAssignmentDto,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

fn assignment_write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow::anyhow!("Subject or teacher not found"));
    }
    AppError::from(err)
}

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db, dto), fields(title = %dto.title, subject_id = %dto.subject_id))]
    pub async fn create_assignment(
        db: &PgPool,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            r#"INSERT INTO assignments
                   (title, description, subject_id, teacher_id, class_name, section, due_date, max_marks)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {}"#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.subject_id)
        .bind(dto.teacher_id)
        .bind(&dto.class_name)
        .bind(&dto.section)
        .bind(dto.due_date)
        .bind(dto.max_marks.unwrap_or(DEFAULT_MAX_MARKS))
        .fetch_one(db)
        .await
        .map_err(assignment_write_error)?;

        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn get_assignments(
        db: &PgPool,
        filters: AssignmentFilterParams,
    ) -> Result<PaginatedAssignmentsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM assignments
               WHERE ($1::uuid IS NULL OR subject_id = $1)
                 AND ($2::text IS NULL OR class_name = $2)
                 AND ($3::text IS NULL OR section = $3)
                 AND ($4::uuid IS NULL OR teacher_id = $4)"#,
        )
        .bind(filters.subject_id)
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.teacher_id)
        .fetch_one(db)
        .await?;

        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            r#"SELECT {} FROM assignments
               WHERE ($1::uuid IS NULL OR subject_id = $1)
                 AND ($2::text IS NULL OR class_name = $2)
                 AND ($3::text IS NULL OR section = $3)
                 AND ($4::uuid IS NULL OR teacher_id = $4)
               ORDER BY due_date DESC
               LIMIT $5 OFFSET $6"#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(filters.subject_id)
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.teacher_id)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAssignmentsResponse {
            data: assignments,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_assignment(db: &PgPool, id: Uuid) -> Result<Assignment, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {} FROM assignments WHERE id = $1",
            ASSIGNMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Assignment not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_assignment(
        db: &PgPool,
        id: Uuid,
        dto: UpdateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let existing = Self::get_assignment(db, id).await?;

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            r#"UPDATE assignments
               SET title = $1, description = $2, subject_id = $3, teacher_id = $4,
                   class_name = $5, section = $6, due_date = $7, max_marks = $8,
                   updated_at = NOW()
               WHERE id = $9
               RETURNING {}"#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.description.or(existing.description))
        .bind(dto.subject_id.unwrap_or(existing.subject_id))
        .bind(dto.teacher_id.or(existing.teacher_id))
        .bind(dto.class_name.unwrap_or(existing.class_name))
        .bind(dto.section.or(existing.section))
        .bind(dto.due_date.unwrap_or(existing.due_date))
        .bind(dto.max_marks.unwrap_or(existing.max_marks))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(assignment_write_error)?;

        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn delete_assignment(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Assignment not found")));
        }

        Ok(())
    }
}
