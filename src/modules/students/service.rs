use edudesk_core::errors::map_unique_violation;
use edudesk_core::search::search_pattern;
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, STUDENT_COLUMNS, Student, StudentFilterParams,
    UpdateStudentDto,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::scope::StudentScope;

const DUPLICATE_STUDENT: &str =
    "A student with this admission number or linked account already exists";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto), fields(admission_number = %dto.admission_number))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students
                   (user_id, parent_user_id, admission_number, first_name, last_name,
                    date_of_birth, gender, class_name, section, roll_number, guardian_name,
                    guardian_phone, address, is_active)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
               RETURNING {}"#,
            STUDENT_COLUMNS
        ))
        .bind(dto.user_id)
        .bind(dto.parent_user_id)
        .bind(dto.admission_number.trim())
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.date_of_birth)
        .bind(&dto.gender)
        .bind(&dto.class_name)
        .bind(&dto.section)
        .bind(&dto.roll_number)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(&dto.address)
        .bind(dto.is_active.unwrap_or(true))
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_STUDENT))?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        scope: &StudentScope,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());
        let scoped_ids = scope.ids();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM students
               WHERE ($1::text IS NULL OR class_name = $1)
                 AND ($2::text IS NULL OR section = $2)
                 AND ($3::bool IS NULL OR is_active = $3)
                 AND ($4::text IS NULL
                      OR first_name ILIKE $4
                      OR last_name ILIKE $4
                      OR admission_number ILIKE $4)
                 AND ($5::uuid[] IS NULL OR id = ANY($5))"#,
        )
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.is_active)
        .bind(&search)
        .bind(&scoped_ids)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            r#"SELECT {} FROM students
               WHERE ($1::text IS NULL OR class_name = $1)
                 AND ($2::text IS NULL OR section = $2)
                 AND ($3::bool IS NULL OR is_active = $3)
                 AND ($4::text IS NULL
                      OR first_name ILIKE $4
                      OR last_name ILIKE $4
                      OR admission_number ILIKE $4)
                 AND ($5::uuid[] IS NULL OR id = ANY($5))
               ORDER BY class_name, last_name, first_name
               LIMIT $6 OFFSET $7"#,
            STUDENT_COLUMNS
        ))
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.is_active)
        .bind(&search)
        .bind(&scoped_ids)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, id).await?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students
               SET user_id = $1, parent_user_id = $2, admission_number = $3, first_name = $4,
                   last_name = $5, date_of_birth = $6, gender = $7, class_name = $8,
                   section = $9, roll_number = $10, guardian_name = $11, guardian_phone = $12,
                   address = $13, is_active = $14, updated_at = NOW()
               WHERE id = $15
               RETURNING {}"#,
            STUDENT_COLUMNS
        ))
        .bind(dto.user_id.or(existing.user_id))
        .bind(dto.parent_user_id.or(existing.parent_user_id))
        .bind(dto.admission_number.unwrap_or(existing.admission_number))
        .bind(dto.first_name.unwrap_or(existing.first_name))
        .bind(dto.last_name.unwrap_or(existing.last_name))
        .bind(dto.date_of_birth.or(existing.date_of_birth))
        .bind(dto.gender.or(existing.gender))
        .bind(dto.class_name.unwrap_or(existing.class_name))
        .bind(dto.section.or(existing.section))
        .bind(dto.roll_number.or(existing.roll_number))
        .bind(dto.guardian_name.or(existing.guardian_name))
        .bind(dto.guardian_phone.or(existing.guardian_phone))
        .bind(dto.address.or(existing.address))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_STUDENT))?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}
