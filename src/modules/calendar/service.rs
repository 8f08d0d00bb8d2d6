use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::calendar::{
    CALENDAR_EVENT_COLUMNS, CalendarEvent, CalendarEventFilterParams, CreateCalendarEventDto,
    PaginatedCalendarEventsResponse, UpdateCalendarEventDto, check_date_order,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct CalendarService;

impl CalendarService {
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_event(
        db: &PgPool,
        created_by: Uuid,
        dto: CreateCalendarEventDto,
    ) -> Result<CalendarEvent, AppError> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"INSERT INTO calendar_events
                   (title, description, event_type, start_date, end_date, all_day, location, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {}"#,
            CALENDAR_EVENT_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.event_type.unwrap_or_default())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.all_day.unwrap_or(false))
        .bind(&dto.location)
        .bind(created_by)
        .fetch_one(db)
        .await?;

        Ok(event)
    }

    /// Events overlapping the inclusive `from`..`to` window (UTC dates).
    #[instrument(skip(db))]
    pub async fn get_events(
        db: &PgPool,
        filters: CalendarEventFilterParams,
    ) -> Result<PaginatedCalendarEventsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM calendar_events
               WHERE ($1::date IS NULL OR (end_date AT TIME ZONE 'UTC')::date >= $1)
                 AND ($2::date IS NULL OR (start_date AT TIME ZONE 'UTC')::date <= $2)
                 AND ($3::event_type IS NULL OR event_type = $3)"#,
        )
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.event_type)
        .fetch_one(db)
        .await?;

        let events = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"SELECT {} FROM calendar_events
               WHERE ($1::date IS NULL OR (end_date AT TIME ZONE 'UTC')::date >= $1)
                 AND ($2::date IS NULL OR (start_date AT TIME ZONE 'UTC')::date <= $2)
                 AND ($3::event_type IS NULL OR event_type = $3)
               ORDER BY start_date, title
               LIMIT $4 OFFSET $5"#,
            CALENDAR_EVENT_COLUMNS
        ))
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.event_type)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedCalendarEventsResponse {
            data: events,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    /// Events still running or starting within the next `days` days.
    #[instrument(skip(db))]
    pub async fn upcoming(
        db: &PgPool,
        days: i32,
        limit: i64,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let events = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"SELECT {} FROM calendar_events
               WHERE end_date >= NOW()
                 AND start_date <= NOW() + make_interval(days => $1)
               ORDER BY start_date
               LIMIT $2"#,
            CALENDAR_EVENT_COLUMNS
        ))
        .bind(days)
        .bind(limit)
        .fetch_all(db)
        .await?;

        Ok(events)
    }

    #[instrument(skip(db))]
    pub async fn get_event(db: &PgPool, id: Uuid) -> Result<CalendarEvent, AppError> {
        sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {} FROM calendar_events WHERE id = $1",
            CALENDAR_EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Calendar event not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_event(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCalendarEventDto,
    ) -> Result<CalendarEvent, AppError> {
        let existing = Self::get_event(db, id).await?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        check_date_order(start_date, end_date).map_err(|e| {
            AppError::unprocessable(anyhow::anyhow!("{}", e.message.unwrap_or_default()))
        })?;

        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"UPDATE calendar_events
               SET title = $1, description = $2, event_type = $3, start_date = $4,
                   end_date = $5, all_day = $6, location = $7, updated_at = NOW()
               WHERE id = $8
               RETURNING {}"#,
            CALENDAR_EVENT_COLUMNS
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.description.or(existing.description))
        .bind(dto.event_type.unwrap_or(existing.event_type))
        .bind(start_date)
        .bind(end_date)
        .bind(dto.all_day.unwrap_or(existing.all_day))
        .bind(dto.location.or(existing.location))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(event)
    }

    #[instrument(skip(db))]
    pub async fn delete_event(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Calendar event not found"
            )));
        }

        Ok(())
    }
}
