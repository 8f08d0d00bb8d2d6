use chrono::Utc;
use edudesk_core::search::search_pattern;
use edudesk_core::{AppError, PaginationMeta, Role};
use edudesk_models::notices::{
    CreateNoticeDto, NOTICE_COLUMNS, Notice, NoticeFilterParams, PaginatedNoticesResponse,
    UpdateNoticeDto,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

/// Who is reading: notice admins see every notice, everyone else only what
/// is currently visible to their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeReader {
    Admin,
    Role(Role),
}

impl NoticeReader {
    fn audience_role(&self) -> Option<Role> {
        match self {
            NoticeReader::Admin => None,
            NoticeReader::Role(role) => Some(*role),
        }
    }
}

const VISIBILITY_FILTER: &str = r#"($1::user_role IS NULL OR (
        is_active
        AND publish_date <= NOW()
        AND (expires_at IS NULL OR expires_at > NOW())
        AND (cardinality(audience) = 0 OR $1 = ANY(audience))))"#;

pub struct NoticeService;

impl NoticeService {
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_notice(
        db: &PgPool,
        published_by: Uuid,
        dto: CreateNoticeDto,
    ) -> Result<Notice, AppError> {
        let notice = sqlx::query_as::<_, Notice>(&format!(
            r#"INSERT INTO notices
                   (title, content, audience, priority, published_by, publish_date, expires_at, is_active)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {}"#,
            NOTICE_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(&dto.audience)
        .bind(dto.priority.unwrap_or_default())
        .bind(published_by)
        .bind(dto.publish_date.unwrap_or_else(Utc::now))
        .bind(dto.expires_at)
        .bind(dto.is_active.unwrap_or(true))
        .fetch_one(db)
        .await?;

        Ok(notice)
    }

    #[instrument(skip(db))]
    pub async fn get_notices(
        db: &PgPool,
        reader: NoticeReader,
        filters: NoticeFilterParams,
    ) -> Result<PaginatedNoticesResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());
        let is_active = match reader {
            NoticeReader::Admin => filters.is_active,
            NoticeReader::Role(_) => None,
        };

        let conditions = format!(
            r#"{}
               AND ($2::notice_priority IS NULL OR priority = $2)
               AND ($3::boolean IS NULL OR is_active = $3)
               AND ($4::text IS NULL OR title ILIKE $4 OR content ILIKE $4)"#,
            VISIBILITY_FILTER
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM notices WHERE {}",
            conditions
        ))
        .bind(reader.audience_role())
        .bind(filters.priority)
        .bind(is_active)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let notices = sqlx::query_as::<_, Notice>(&format!(
            r#"SELECT {} FROM notices WHERE {}
               ORDER BY publish_date DESC, created_at DESC
               LIMIT $5 OFFSET $6"#,
            NOTICE_COLUMNS, conditions
        ))
        .bind(reader.audience_role())
        .bind(filters.priority)
        .bind(is_active)
        .bind(&search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedNoticesResponse {
            data: notices,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    /// Notices hidden from the reader are reported as missing.
    #[instrument(skip(db))]
    pub async fn get_notice(
        db: &PgPool,
        reader: NoticeReader,
        id: Uuid,
    ) -> Result<Notice, AppError> {
        sqlx::query_as::<_, Notice>(&format!(
            "SELECT {} FROM notices WHERE {} AND id = $2",
            NOTICE_COLUMNS, VISIBILITY_FILTER
        ))
        .bind(reader.audience_role())
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Notice not found")))
    }

    /// Most recent notices visible to `reader`, for the dashboard.
    #[instrument(skip(db))]
    pub async fn latest(
        db: &PgPool,
        reader: NoticeReader,
        limit: i64,
    ) -> Result<Vec<Notice>, AppError> {
        let notices = sqlx::query_as::<_, Notice>(&format!(
            r#"SELECT {} FROM notices WHERE {} AND is_active
               ORDER BY publish_date DESC LIMIT $2"#,
            NOTICE_COLUMNS, VISIBILITY_FILTER
        ))
        .bind(reader.audience_role())
        .bind(limit)
        .fetch_all(db)
        .await?;

        Ok(notices)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_notice(
        db: &PgPool,
        id: Uuid,
        dto: UpdateNoticeDto,
    ) -> Result<Notice, AppError> {
        let existing = Self::get_notice(db, NoticeReader::Admin, id).await?;

        let notice = sqlx::query_as::<_, Notice>(&format!(
            r#"UPDATE notices
               SET title = $1, content = $2, audience = $3, priority = $4,
                   publish_date = $5, expires_at = $6, is_active = $7, updated_at = NOW()
               WHERE id = $8
               RETURNING {}"#,
            NOTICE_COLUMNS
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.content.unwrap_or(existing.content))
        .bind(dto.audience.unwrap_or(existing.audience))
        .bind(dto.priority.unwrap_or(existing.priority))
        .bind(dto.publish_date.unwrap_or(existing.publish_date))
        .bind(dto.expires_at.or(existing.expires_at))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(notice)
    }

    #[instrument(skip(db))]
    pub async fn delete_notice(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Notice not found")));
        }

        Ok(())
    }
}
