use edudesk_core::errors::{is_foreign_key_violation, map_unique_violation};
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::results::{
    CreateResultDto, ExamResult, PaginatedResultsResponse, RESULT_COLUMNS, ReportCard,
    ReportCardEntry, ReportCardParams, ReportCardStudent, ResultFilterParams, UpdateResultDto,
    check_marks, compute_grade,
};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::scope::StudentScope;

const DUPLICATE_RESULT: &str =
    "A result for this student, subject and exam already exists for that term";

fn result_write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow::anyhow!("Student or subject not found"));
    }
    map_unique_violation(err, DUPLICATE_RESULT)
}

#[derive(FromRow)]
struct StudentHeader {
    id: Uuid,
    first_name: String,
    last_name: String,
    admission_number: String,
    class_name: String,
    section: Option<String>,
}

pub struct ResultService;

impl ResultService {
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, subject_id = %dto.subject_id))]
    pub async fn create_result(db: &PgPool, dto: CreateResultDto) -> Result<ExamResult, AppError> {
        let grade = compute_grade(dto.marks_obtained, dto.max_marks);

        let result = sqlx::query_as::<_, ExamResult>(&format!(
            r#"INSERT INTO results
                   (student_id, subject_id, exam_type, term, academic_year,
                    marks_obtained, max_marks, grade, remarks)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {}"#,
            RESULT_COLUMNS
        ))
        .bind(dto.student_id)
        .bind(dto.subject_id)
        .bind(&dto.exam_type)
        .bind(&dto.term)
        .bind(&dto.academic_year)
        .bind(dto.marks_obtained)
        .bind(dto.max_marks)
        .bind(grade)
        .bind(&dto.remarks)
        .fetch_one(db)
        .await
        .map_err(result_write_error)?;

        Ok(result)
    }

    #[instrument(skip(db, scope))]
    pub async fn get_results(
        db: &PgPool,
        scope: &StudentScope,
        filters: ResultFilterParams,
    ) -> Result<PaginatedResultsResponse, AppError> {
        let allowed = scope.ids();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM results
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::uuid IS NULL OR subject_id = $2)
                 AND ($3::text IS NULL OR exam_type = $3)
                 AND ($4::text IS NULL OR term = $4)
                 AND ($5::text IS NULL OR academic_year = $5)
                 AND ($6::uuid[] IS NULL OR student_id = ANY($6))"#,
        )
        .bind(filters.student_id)
        .bind(filters.subject_id)
        .bind(&filters.exam_type)
        .bind(&filters.term)
        .bind(&filters.academic_year)
        .bind(&allowed)
        .fetch_one(db)
        .await?;

        let results = sqlx::query_as::<_, ExamResult>(&format!(
            r#"SELECT {} FROM results
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::uuid IS NULL OR subject_id = $2)
                 AND ($3::text IS NULL OR exam_type = $3)
                 AND ($4::text IS NULL OR term = $4)
                 AND ($5::text IS NULL OR academic_year = $5)
                 AND ($6::uuid[] IS NULL OR student_id = ANY($6))
               ORDER BY academic_year DESC, term, created_at DESC
               LIMIT $7 OFFSET $8"#,
            RESULT_COLUMNS
        ))
        .bind(filters.student_id)
        .bind(filters.subject_id)
        .bind(&filters.exam_type)
        .bind(&filters.term)
        .bind(&filters.academic_year)
        .bind(&allowed)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedResultsResponse {
            data: results,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_result(db: &PgPool, id: Uuid) -> Result<ExamResult, AppError> {
        sqlx::query_as::<_, ExamResult>(&format!(
            "SELECT {} FROM results WHERE id = $1",
            RESULT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Result not found")))
    }

    /// Grade is recomputed from the merged marks on every update.
    #[instrument(skip(db, dto))]
    pub async fn update_result(
        db: &PgPool,
        id: Uuid,
        dto: UpdateResultDto,
    ) -> Result<ExamResult, AppError> {
        let existing = Self::get_result(db, id).await?;

        let marks_obtained = dto.marks_obtained.unwrap_or(existing.marks_obtained);
        let max_marks = dto.max_marks.unwrap_or(existing.max_marks);
        check_marks(marks_obtained, max_marks).map_err(|e| {
            AppError::unprocessable(anyhow::anyhow!("{}", e.message.unwrap_or_default()))
        })?;
        let grade = compute_grade(marks_obtained, max_marks);

        let result = sqlx::query_as::<_, ExamResult>(&format!(
            r#"UPDATE results
               SET exam_type = $1, term = $2, academic_year = $3, marks_obtained = $4,
                   max_marks = $5, grade = $6, remarks = $7, updated_at = NOW()
               WHERE id = $8
               RETURNING {}"#,
            RESULT_COLUMNS
        ))
        .bind(dto.exam_type.unwrap_or(existing.exam_type))
        .bind(dto.term.unwrap_or(existing.term))
        .bind(dto.academic_year.unwrap_or(existing.academic_year))
        .bind(marks_obtained)
        .bind(max_marks)
        .bind(grade)
        .bind(dto.remarks.or(existing.remarks))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(result_write_error)?;

        Ok(result)
    }

    #[instrument(skip(db))]
    pub async fn delete_result(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM results WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Result not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_report_card(
        db: &PgPool,
        student_id: Uuid,
        params: ReportCardParams,
    ) -> Result<ReportCard, AppError> {
        let header = sqlx::query_as::<_, StudentHeader>(
            r#"SELECT id, first_name, last_name, admission_number, class_name, section
               FROM students WHERE id = $1"#,
        )
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let entries = sqlx::query_as::<_, ReportCardEntry>(
            r#"SELECT r.subject_id, s.name AS subject_name, s.code AS subject_code,
                      r.exam_type, r.term, r.academic_year, r.marks_obtained, r.max_marks, r.grade
               FROM results r
               JOIN subjects s ON s.id = r.subject_id
               WHERE r.student_id = $1
                 AND ($2::text IS NULL OR r.term = $2)
                 AND ($3::text IS NULL OR r.academic_year = $3)
               ORDER BY r.academic_year, r.term, s.name, r.exam_type"#,
        )
        .bind(student_id)
        .bind(&params.term)
        .bind(&params.academic_year)
        .fetch_all(db)
        .await?;

        let student = ReportCardStudent {
            id: header.id,
            name: format!("{} {}", header.first_name, header.last_name),
            admission_number: header.admission_number,
            class_name: header.class_name,
            section: header.section,
        };

        Ok(ReportCard::build(
            student,
            params.term,
            params.academic_year,
            entries,
        ))
    }
}
