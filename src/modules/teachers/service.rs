use edudesk_core::errors::map_unique_violation;
use edudesk_core::search::search_pattern;
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, TEACHER_COLUMNS, Teacher, TeacherFilterParams,
    UpdateTeacherDto,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

const DUPLICATE_TEACHER: &str = "A teacher with this employee ID or email already exists";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, dto), fields(employee_id = %dto.employee_id))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<Teacher, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            r#"INSERT INTO teachers
                   (user_id, employee_id, first_name, last_name, email, phone, qualification,
                    specialization, joining_date, is_class_teacher, class_name, section, is_active)
               VALUES ($1, $2, $3, $4, LOWER($5), $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING {}"#,
            TEACHER_COLUMNS
        ))
        .bind(dto.user_id)
        .bind(dto.employee_id.trim())
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.email.trim())
        .bind(&dto.phone)
        .bind(&dto.qualification)
        .bind(&dto.specialization)
        .bind(dto.joining_date)
        .bind(dto.is_class_teacher.unwrap_or(false))
        .bind(&dto.class_name)
        .bind(&dto.section)
        .bind(dto.is_active.unwrap_or(true))
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_TEACHER))?;

        Ok(teacher)
    }

    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &PgPool,
        filters: TeacherFilterParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());
        let specialization = search_pattern(filters.specialization.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM teachers
               WHERE ($1::text IS NULL OR specialization ILIKE $1)
                 AND ($2::bool IS NULL OR is_active = $2)
                 AND ($3::text IS NULL
                      OR first_name ILIKE $3
                      OR last_name ILIKE $3
                      OR email ILIKE $3
                      OR employee_id ILIKE $3)"#,
        )
        .bind(&specialization)
        .bind(filters.is_active)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let teachers = sqlx::query_as::<_, Teacher>(&format!(
            r#"SELECT {} FROM teachers
               WHERE ($1::text IS NULL OR specialization ILIKE $1)
                 AND ($2::bool IS NULL OR is_active = $2)
                 AND ($3::text IS NULL
                      OR first_name ILIKE $3
                      OR last_name ILIKE $3
                      OR email ILIKE $3
                      OR employee_id ILIKE $3)
               ORDER BY last_name, first_name
               LIMIT $4 OFFSET $5"#,
            TEACHER_COLUMNS
        ))
        .bind(&specialization)
        .bind(filters.is_active)
        .bind(&search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedTeachersResponse {
            data: teachers,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: Uuid) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {} FROM teachers WHERE id = $1",
            TEACHER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let existing = Self::get_teacher(db, id).await?;

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            r#"UPDATE teachers
               SET user_id = $1, employee_id = $2, first_name = $3, last_name = $4,
                   email = LOWER($5), phone = $6, qualification = $7, specialization = $8,
                   joining_date = $9, is_class_teacher = $10, class_name = $11, section = $12,
                   is_active = $13, updated_at = NOW()
               WHERE id = $14
               RETURNING {}"#,
            TEACHER_COLUMNS
        ))
        .bind(dto.user_id.or(existing.user_id))
        .bind(dto.employee_id.unwrap_or(existing.employee_id))
        .bind(dto.first_name.unwrap_or(existing.first_name))
        .bind(dto.last_name.unwrap_or(existing.last_name))
        .bind(dto.email.map(|e| e.trim().to_string()).unwrap_or(existing.email))
        .bind(dto.phone.or(existing.phone))
        .bind(dto.qualification.or(existing.qualification))
        .bind(dto.specialization.or(existing.specialization))
        .bind(dto.joining_date.or(existing.joining_date))
        .bind(dto.is_class_teacher.unwrap_or(existing.is_class_teacher))
        .bind(dto.class_name.or(existing.class_name))
        .bind(dto.section.or(existing.section))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_TEACHER))?;

        Ok(teacher)
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }

        Ok(())
    }
}
