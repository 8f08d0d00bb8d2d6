//! Fee invoices, payments and totals.
//!
//! The stored status only ever holds `pending`, `partial`, `paid` or `waived`.
//! Reads report unpaid fees past their due date as `overdue`, both in the
//! returned rows and when filtering by status.

use chrono::{NaiveDate, Utc};
use edudesk_core::errors::is_foreign_key_violation;
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::fees::{
    CreateFeeDto, FEE_COLUMNS, Fee, FeeFilterParams, FeeStatus, FeeSummary, PaginatedFeesResponse,
    RecordPaymentDto, UpdateFeeDto,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::track_payment_recorded;
use crate::middleware::scope::StudentScope;

/// SQL expression for the read-time status; `$today` must be bound as a date.
fn effective_status_sql(today_param: &str) -> String {
    format!(
        "(CASE WHEN status IN ('pending', 'partial') AND due_date < {}::date \
         THEN 'overdue'::fee_status ELSE status END)",
        today_param
    )
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolves the status an update should store.
pub fn resolve_update_status(
    current: FeeStatus,
    requested: Option<FeeStatus>,
    amount: i64,
    paid_amount: i64,
) -> Result<FeeStatus, AppError> {
    match requested {
        Some(FeeStatus::Waived) => Ok(FeeStatus::Waived),
        Some(FeeStatus::Pending) => Ok(FeeStatus::from_amounts(amount, paid_amount)),
        Some(_) => Err(AppError::unprocessable(anyhow::anyhow!(
            "Status can only be set to pending or waived; payments drive the rest"
        ))),
        None if current == FeeStatus::Waived => Ok(FeeStatus::Waived),
        None => Ok(FeeStatus::from_amounts(amount, paid_amount)),
    }
}

pub struct FeeService;

impl FeeService {
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, amount = dto.amount))]
    pub async fn create_fee(db: &PgPool, dto: CreateFeeDto) -> Result<Fee, AppError> {
        let fee = sqlx::query_as::<_, Fee>(&format!(
            r#"INSERT INTO fees (student_id, fee_type, description, amount, paid_amount, due_date, status)
               VALUES ($1, $2, $3, $4, 0, $5, 'pending')
               RETURNING {}"#,
            FEE_COLUMNS
        ))
        .bind(dto.student_id)
        .bind(dto.fee_type.trim())
        .bind(&dto.description)
        .bind(dto.amount)
        .bind(dto.due_date)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::bad_request(anyhow::anyhow!("Student not found"));
            }
            AppError::from(e)
        })?;

        Ok(fee.with_effective_status(today()))
    }

    #[instrument(skip(db))]
    pub async fn get_fees(
        db: &PgPool,
        scope: &StudentScope,
        filters: FeeFilterParams,
    ) -> Result<PaginatedFeesResponse, AppError> {
        let today = today();
        let scoped_ids = scope.ids();
        let where_clause = format!(
            r#"WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::fee_status IS NULL OR {} = $2)
                 AND ($3::text IS NULL OR fee_type = $3)
                 AND ($4::uuid[] IS NULL OR student_id = ANY($4))"#,
            effective_status_sql("$5")
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM fees {}",
            where_clause
        ))
        .bind(filters.student_id)
        .bind(filters.status)
        .bind(&filters.fee_type)
        .bind(&scoped_ids)
        .bind(today)
        .fetch_one(db)
        .await?;

        let fees = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {} FROM fees {} ORDER BY due_date, created_at LIMIT $6 OFFSET $7",
            FEE_COLUMNS, where_clause
        ))
        .bind(filters.student_id)
        .bind(filters.status)
        .bind(&filters.fee_type)
        .bind(&scoped_ids)
        .bind(today)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedFeesResponse {
            data: fees
                .into_iter()
                .map(|fee| fee.with_effective_status(today))
                .collect(),
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_fee(db: &PgPool, id: Uuid) -> Result<Fee, AppError> {
        Self::find_stored(db, id)
            .await
            .map(|fee| fee.with_effective_status(today()))
    }

    async fn find_stored(db: &PgPool, id: Uuid) -> Result<Fee, AppError> {
        sqlx::query_as::<_, Fee>(&format!("SELECT {} FROM fees WHERE id = $1", FEE_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Fee not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_fee(db: &PgPool, id: Uuid, dto: UpdateFeeDto) -> Result<Fee, AppError> {
        let existing = Self::find_stored(db, id).await?;

        let amount = dto.amount.unwrap_or(existing.amount);
        if amount < existing.paid_amount {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Amount cannot be less than the {} already paid",
                existing.paid_amount
            )));
        }
        let status =
            resolve_update_status(existing.status, dto.status, amount, existing.paid_amount)?;

        let fee = sqlx::query_as::<_, Fee>(&format!(
            r#"UPDATE fees
               SET fee_type = $1, description = $2, amount = $3, due_date = $4, status = $5,
                   updated_at = NOW()
               WHERE id = $6
               RETURNING {}"#,
            FEE_COLUMNS
        ))
        .bind(dto.fee_type.unwrap_or(existing.fee_type))
        .bind(dto.description.or(existing.description))
        .bind(amount)
        .bind(dto.due_date.unwrap_or(existing.due_date))
        .bind(status)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(fee.with_effective_status(today()))
    }

    /// Adds a payment in one conditional update, so concurrent payments can
    /// never push `paid_amount` past `amount`.
    #[instrument(skip(db, dto), fields(amount = dto.amount))]
    pub async fn record_payment(
        db: &PgPool,
        id: Uuid,
        dto: RecordPaymentDto,
    ) -> Result<Fee, AppError> {
        let paid_date = dto.paid_date.unwrap_or_else(today);

        let updated = sqlx::query_as::<_, Fee>(&format!(
            r#"UPDATE fees
               SET paid_amount = paid_amount + $1,
                   status = CASE WHEN paid_amount + $1 >= amount
                                 THEN 'paid'::fee_status ELSE 'partial'::fee_status END,
                   paid_date = $2,
                   updated_at = NOW()
               WHERE id = $3 AND status <> 'waived' AND paid_amount + $1 <= amount
               RETURNING {}"#,
            FEE_COLUMNS
        ))
        .bind(dto.amount)
        .bind(paid_date)
        .bind(id)
        .fetch_optional(db)
        .await?;

        if let Some(fee) = updated {
            track_payment_recorded(dto.amount);
            tracing::info!(fee_id = %fee.id, status = ?fee.status, "Payment recorded");
            return Ok(fee.with_effective_status(today()));
        }

        let existing = Self::find_stored(db, id).await?;
        let message = match existing.status {
            FeeStatus::Waived => "Cannot record a payment on a waived fee".to_string(),
            FeeStatus::Paid => "Fee is already fully paid".to_string(),
            _ => format!(
                "Payment of {} exceeds the outstanding balance of {}",
                dto.amount,
                existing.outstanding()
            ),
        };
        Err(AppError::bad_request(anyhow::anyhow!(message)))
    }

    #[instrument(skip(db))]
    pub async fn delete_fee(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM fees WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Fee not found")));
        }

        Ok(())
    }

    /// Totals over non-waived fees.
    #[instrument(skip(db))]
    pub async fn get_summary(
        db: &PgPool,
        scope: &StudentScope,
        student_id: Option<Uuid>,
    ) -> Result<FeeSummary, AppError> {
        let summary = sqlx::query_as::<_, FeeSummary>(
            r#"SELECT
                   COUNT(*) AS fee_count,
                   COALESCE(SUM(amount), 0)::BIGINT AS total_billed,
                   COALESCE(SUM(paid_amount), 0)::BIGINT AS total_paid,
                   COALESCE(SUM(amount - paid_amount), 0)::BIGINT AS outstanding,
                   COUNT(*) FILTER (
                       WHERE status IN ('pending', 'partial') AND due_date < $3
                   ) AS overdue_count
               FROM fees
               WHERE status <> 'waived'
                 AND ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::uuid[] IS NULL OR student_id = ANY($2))"#,
        )
        .bind(student_id)
        .bind(scope.ids())
        .bind(today())
        .fetch_one(db)
        .await?;

        Ok(summary)
    }
}
