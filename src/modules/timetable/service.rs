use edudesk_core::errors::{is_foreign_key_violation, map_unique_violation};
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::timetable::{
    CreateTimetableEntryDto, PaginatedTimetableResponse, TIMETABLE_COLUMNS, TimetableEntry,
    TimetableFilterParams, UpdateTimetableEntryDto, check_time_order,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

fn timetable_write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow::anyhow!("Subject or teacher not found"));
    }
    map_unique_violation(
        err,
        "This class already has a lesson scheduled for that day and period",
    )
}

pub struct TimetableService;

impl TimetableService {
    /// A teacher cannot take two classes in the same day and period.
    async fn ensure_teacher_free(
        db: &PgPool,
        teacher_id: Option<Uuid>,
        day_of_week: i16,
        period: i16,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let Some(teacher_id) = teacher_id else {
            return Ok(());
        };

        let busy = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM timetable
                   WHERE teacher_id = $1 AND day_of_week = $2 AND period = $3
                     AND ($4::uuid IS NULL OR id <> $4))"#,
        )
        .bind(teacher_id)
        .bind(day_of_week)
        .bind(period)
        .bind(exclude_id)
        .fetch_one(db)
        .await?;

        if busy {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Teacher is already scheduled for that day and period"
            )));
        }
        Ok(())
    }

    #[instrument(
        skip(db, dto),
        fields(class_name = %dto.class_name, day = dto.day_of_week, period = dto.period)
    )]
    pub async fn create_entry(
        db: &PgPool,
        dto: CreateTimetableEntryDto,
    ) -> Result<TimetableEntry, AppError> {
        Self::ensure_teacher_free(db, dto.teacher_id, dto.day_of_week, dto.period, None).await?;

        let entry = sqlx::query_as::<_, TimetableEntry>(&format!(
            r#"INSERT INTO timetable
                   (class_name, section, day_of_week, period, subject_id, teacher_id,
                    start_time, end_time, room)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {}"#,
            TIMETABLE_COLUMNS
        ))
        .bind(&dto.class_name)
        .bind(&dto.section)
        .bind(dto.day_of_week)
        .bind(dto.period)
        .bind(dto.subject_id)
        .bind(dto.teacher_id)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(&dto.room)
        .fetch_one(db)
        .await
        .map_err(timetable_write_error)?;

        Ok(entry)
    }

    #[instrument(skip(db))]
    pub async fn get_entries(
        db: &PgPool,
        filters: TimetableFilterParams,
    ) -> Result<PaginatedTimetableResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM timetable
               WHERE ($1::text IS NULL OR class_name = $1)
                 AND ($2::text IS NULL OR section = $2)
                 AND ($3::int IS NULL OR day_of_week = $3)
                 AND ($4::uuid IS NULL OR teacher_id = $4)
                 AND ($5::uuid IS NULL OR subject_id = $5)"#,
        )
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.day_of_week)
        .bind(filters.teacher_id)
        .bind(filters.subject_id)
        .fetch_one(db)
        .await?;

        let entries = sqlx::query_as::<_, TimetableEntry>(&format!(
            r#"SELECT {} FROM timetable
               WHERE ($1::text IS NULL OR class_name = $1)
                 AND ($2::text IS NULL OR section = $2)
                 AND ($3::int IS NULL OR day_of_week = $3)
                 AND ($4::uuid IS NULL OR teacher_id = $4)
                 AND ($5::uuid IS NULL OR subject_id = $5)
               ORDER BY day_of_week, period, class_name, section
               LIMIT $6 OFFSET $7"#,
            TIMETABLE_COLUMNS
        ))
        .bind(&filters.class_name)
        .bind(&filters.section)
        .bind(filters.day_of_week)
        .bind(filters.teacher_id)
        .bind(filters.subject_id)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedTimetableResponse {
            data: entries,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_entry(db: &PgPool, id: Uuid) -> Result<TimetableEntry, AppError> {
        sqlx::query_as::<_, TimetableEntry>(&format!(
            "SELECT {} FROM timetable WHERE id = $1",
            TIMETABLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Timetable entry not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_entry(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTimetableEntryDto,
    ) -> Result<TimetableEntry, AppError> {
        let existing = Self::get_entry(db, id).await?;

        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);
        check_time_order(start_time, end_time).map_err(|e| {
            AppError::unprocessable(anyhow::anyhow!(
                "{}",
                e.message.unwrap_or_default()
            ))
        })?;

        let day_of_week = dto.day_of_week.unwrap_or(existing.day_of_week);
        let period = dto.period.unwrap_or(existing.period);
        let teacher_id = dto.teacher_id.or(existing.teacher_id);
        Self::ensure_teacher_free(db, teacher_id, day_of_week, period, Some(id)).await?;

        let entry = sqlx::query_as::<_, TimetableEntry>(&format!(
            r#"UPDATE timetable
               SET class_name = $1, section = $2, day_of_week = $3, period = $4,
                   subject_id = $5, teacher_id = $6, start_time = $7, end_time = $8,
                   room = $9, updated_at = NOW()
               WHERE id = $10
               RETURNING {}"#,
            TIMETABLE_COLUMNS
        ))
        .bind(dto.class_name.unwrap_or(existing.class_name))
        .bind(dto.section.or(existing.section))
        .bind(day_of_week)
        .bind(period)
        .bind(dto.subject_id.unwrap_or(existing.subject_id))
        .bind(teacher_id)
        .bind(start_time)
        .bind(end_time)
        .bind(dto.room.or(existing.room))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(timetable_write_error)?;

        Ok(entry)
    }

    #[instrument(skip(db))]
    pub async fn delete_entry(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM timetable WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Timetable entry not found"
            )));
        }

        Ok(())
    }
}
