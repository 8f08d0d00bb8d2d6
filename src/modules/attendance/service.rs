use std::collections::HashMap;

use edudesk_core::errors::{is_foreign_key_violation, map_unique_violation};
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::attendance::{
    ATTENDANCE_COLUMNS, Attendance, AttendanceFilterParams, AttendanceStatus, AttendanceSummary,
    AttendanceSummaryParams, BulkAttendanceDto, BulkAttendanceEntry, BulkAttendanceResponse,
    CreateAttendanceDto, PaginatedAttendanceResponse, UpdateAttendanceDto,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::track_attendance_marked;
use crate::middleware::scope::StudentScope;
use crate::modules::students::service::StudentService;

fn attendance_write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow::anyhow!("Student not found"));
    }
    map_unique_violation(
        err,
        "Attendance is already marked for this student on this date",
    )
}

/// Keeps the last entry per student, in first-seen order.
pub fn dedupe_last_wins(records: Vec<BulkAttendanceEntry>) -> Vec<BulkAttendanceEntry> {
    let mut positions: HashMap<Uuid, usize> = HashMap::new();
    let mut unique: Vec<BulkAttendanceEntry> = Vec::with_capacity(records.len());

    for record in records {
        match positions.get(&record.student_id) {
            Some(&index) => unique[index] = record,
            None => {
                positions.insert(record.student_id, unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

pub struct AttendanceService;

impl AttendanceService {
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, date = %dto.date))]
    pub async fn create_attendance(
        db: &PgPool,
        marked_by: Uuid,
        dto: CreateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let record = sqlx::query_as::<_, Attendance>(&format!(
            r#"INSERT INTO attendance (student_id, date, status, remarks, marked_by)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {}"#,
            ATTENDANCE_COLUMNS
        ))
        .bind(dto.student_id)
        .bind(dto.date)
        .bind(dto.status)
        .bind(&dto.remarks)
        .bind(marked_by)
        .fetch_one(db)
        .await
        .map_err(attendance_write_error)?;

        track_attendance_marked(1);
        Ok(record)
    }

    /// Upserts one record per student for the day; repeated students in the
    /// payload and re-submissions both resolve to the last status sent.
    #[instrument(skip(db, dto), fields(date = %dto.date, records = dto.records.len()))]
    pub async fn bulk_mark(
        db: &PgPool,
        marked_by: Uuid,
        dto: BulkAttendanceDto,
    ) -> Result<BulkAttendanceResponse, AppError> {
        let records = dedupe_last_wins(dto.records);

        let student_ids: Vec<Uuid> = records.iter().map(|r| r.student_id).collect();
        let statuses: Vec<AttendanceStatus> = records.iter().map(|r| r.status).collect();
        let remarks: Vec<Option<String>> = records.iter().map(|r| r.remarks.clone()).collect();

        let result = sqlx::query(
            r#"INSERT INTO attendance (student_id, date, status, remarks, marked_by)
               SELECT r.student_id, $1, r.status, r.remarks, $5
               FROM UNNEST($2::uuid[], $3::attendance_status[], $4::text[])
                    AS r(student_id, status, remarks)
               ON CONFLICT ON CONSTRAINT attendance_student_date_unique DO UPDATE
               SET status = EXCLUDED.status,
                   remarks = EXCLUDED.remarks,
                   marked_by = EXCLUDED.marked_by,
                   updated_at = NOW()"#,
        )
        .bind(dto.date)
        .bind(&student_ids)
        .bind(&statuses)
        .bind(&remarks)
        .bind(marked_by)
        .execute(db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::bad_request(anyhow::anyhow!("One or more students not found"));
            }
            AppError::from(e)
        })?;

        tracing::info!(affected = result.rows_affected(), "Bulk attendance stored");
        track_attendance_marked(records.len());

        Ok(BulkAttendanceResponse {
            date: dto.date,
            marked: records.len(),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_attendance_list(
        db: &PgPool,
        scope: &StudentScope,
        filters: AttendanceFilterParams,
    ) -> Result<PaginatedAttendanceResponse, AppError> {
        let scoped_ids = scope.ids();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM attendance
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::text IS NULL OR student_id IN (
                        SELECT id FROM students
                        WHERE class_name = $2 AND ($3::text IS NULL OR section = $3)))
                 AND ($4::date IS NULL OR date = $4)
                 AND ($5::date IS NULL OR date >= $5)
                 AND ($6::date IS NULL OR date <= $6)
                 AND ($7::attendance_status IS NULL OR status = $7)
                 AND ($8::uuid[] IS NULL OR student_id = ANY($8))"#,
        )
        .bind(filters.student_id)
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.date)
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.status)
        .bind(&scoped_ids)
        .fetch_one(db)
        .await?;

        let records = sqlx::query_as::<_, Attendance>(&format!(
            r#"SELECT {} FROM attendance
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::text IS NULL OR student_id IN (
                        SELECT id FROM students
                        WHERE class_name = $2 AND ($3::text IS NULL OR section = $3)))
                 AND ($4::date IS NULL OR date = $4)
                 AND ($5::date IS NULL OR date >= $5)
                 AND ($6::date IS NULL OR date <= $6)
                 AND ($7::attendance_status IS NULL OR status = $7)
                 AND ($8::uuid[] IS NULL OR student_id = ANY($8))
               ORDER BY date DESC, created_at DESC
               LIMIT $9 OFFSET $10"#,
            ATTENDANCE_COLUMNS
        ))
        .bind(filters.student_id)
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.date)
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.status)
        .bind(&scoped_ids)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAttendanceResponse {
            data: records,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_attendance(db: &PgPool, id: Uuid) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {} FROM attendance WHERE id = $1",
            ATTENDANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Attendance record not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_attendance(
        db: &PgPool,
        id: Uuid,
        marked_by: Uuid,
        dto: UpdateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let existing = Self::get_attendance(db, id).await?;

        let record = sqlx::query_as::<_, Attendance>(&format!(
            r#"UPDATE attendance
               SET status = $1, remarks = $2, marked_by = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING {}"#,
            ATTENDANCE_COLUMNS
        ))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.remarks.or(existing.remarks))
        .bind(marked_by)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(record)
    }

    #[instrument(skip(db))]
    pub async fn delete_attendance(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Attendance record not found"
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_summary(
        db: &PgPool,
        student_id: Uuid,
        params: AttendanceSummaryParams,
    ) -> Result<AttendanceSummary, AppError> {
        StudentService::get_student(db, student_id).await?;

        let (present, absent, late, excused) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"SELECT
                   COUNT(*) FILTER (WHERE status = 'present'),
                   COUNT(*) FILTER (WHERE status = 'absent'),
                   COUNT(*) FILTER (WHERE status = 'late'),
                   COUNT(*) FILTER (WHERE status = 'excused')
               FROM attendance
               WHERE student_id = $1
                 AND ($2::date IS NULL OR date >= $2)
                 AND ($3::date IS NULL OR date <= $3)"#,
        )
        .bind(student_id)
        .bind(params.from)
        .bind(params.to)
        .fetch_one(db)
        .await?;

        Ok(AttendanceSummary::from_counts(
            student_id, present, absent, late, excused,
        ))
    }
}
