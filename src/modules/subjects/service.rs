use edudesk_core::errors::{is_foreign_key_violation, map_unique_violation};
use edudesk_core::search::search_pattern;
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::subjects::{
    CreateSubjectDto, PaginatedSubjectsResponse, SUBJECT_COLUMNS, Subject, SubjectFilterParams,
    UpdateSubjectDto,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

fn subject_write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow::anyhow!("Teacher not found"));
    }
    map_unique_violation(err, "A subject with this code already exists")
}

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(&format!(
            r#"INSERT INTO subjects (name, code, class_name, teacher_id, description)
               VALUES ($1, UPPER($2), $3, $4, $5)
               RETURNING {}"#,
            SUBJECT_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.code.trim())
        .bind(&dto.class_name)
        .bind(dto.teacher_id)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(subject_write_error)?;

        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn get_subjects(
        db: &PgPool,
        filters: SubjectFilterParams,
    ) -> Result<PaginatedSubjectsResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM subjects
               WHERE ($1::text IS NULL OR class_name = $1)
                 AND ($2::uuid IS NULL OR teacher_id = $2)
                 AND ($3::text IS NULL OR name ILIKE $3 OR code ILIKE $3)"#,
        )
        .bind(&filters.class_name)
        .bind(filters.teacher_id)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let subjects = sqlx::query_as::<_, Subject>(&format!(
            r#"SELECT {} FROM subjects
               WHERE ($1::text IS NULL OR class_name = $1)
                 AND ($2::uuid IS NULL OR teacher_id = $2)
                 AND ($3::text IS NULL OR name ILIKE $3 OR code ILIKE $3)
               ORDER BY class_name, name
               LIMIT $4 OFFSET $5"#,
            SUBJECT_COLUMNS
        ))
        .bind(&filters.class_name)
        .bind(filters.teacher_id)
        .bind(&search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedSubjectsResponse {
            data: subjects,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_subject(db: &PgPool, id: Uuid) -> Result<Subject, AppError> {
        sqlx::query_as::<_, Subject>(&format!(
            "SELECT {} FROM subjects WHERE id = $1",
            SUBJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_subject(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let existing = Self::get_subject(db, id).await?;

        let subject = sqlx::query_as::<_, Subject>(&format!(
            r#"UPDATE subjects
               SET name = $1, code = UPPER($2), class_name = $3, teacher_id = $4,
                   description = $5, updated_at = NOW()
               WHERE id = $6
               RETURNING {}"#,
            SUBJECT_COLUMNS
        ))
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.code.map(|c| c.trim().to_string()).unwrap_or(existing.code))
        .bind(dto.class_name.unwrap_or(existing.class_name))
        .bind(dto.teacher_id.or(existing.teacher_id))
        .bind(dto.description.or(existing.description))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(subject_write_error)?;

        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn delete_subject(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }

        Ok(())
    }
}
