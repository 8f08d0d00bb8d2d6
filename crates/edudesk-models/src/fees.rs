//! Fee invoices and payments.
//!
//! Amounts are integers in minor currency units. A fee's stored status moves
//! `pending → partial → paid` as payments arrive, or is set to `waived`.
//! `overdue` is derived at read time for unpaid fees past their due date.

use chrono::{DateTime, NaiveDate, Utc};
use edudesk_core::serde::deserialize_optional_uuid;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "fee_status", rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
    Waived,
}

impl FeeStatus {
    /// Status implied by the amounts alone.
    pub fn from_amounts(amount: i64, paid_amount: i64) -> Self {
        if paid_amount >= amount {
            FeeStatus::Paid
        } else if paid_amount > 0 {
            FeeStatus::Partial
        } else {
            FeeStatus::Pending
        }
    }

    /// Status as reported to clients on `today`.
    pub fn effective(self, due_date: NaiveDate, today: NaiveDate) -> Self {
        match self {
            FeeStatus::Pending | FeeStatus::Partial if due_date < today => FeeStatus::Overdue,
            other => other,
        }
    }
}

pub const FEE_COLUMNS: &str = "id, student_id, fee_type, description, amount, paid_amount, \
    due_date, paid_date, status, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fee {
    pub id: Uuid,
    pub student_id: Uuid,
    #[schema(example = "tuition")]
    pub fee_type: String,
    pub description: Option<String>,
    /// Billed amount in minor units
    pub amount: i64,
    pub paid_amount: i64,
    pub due_date: NaiveDate,
    /// Date of the latest payment
    pub paid_date: Option<NaiveDate>,
    pub status: FeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fee {
    pub fn outstanding(&self) -> i64 {
        (self.amount - self.paid_amount).max(0)
    }

    /// Replaces the stored status with the one clients should see on `today`.
    pub fn with_effective_status(mut self, today: NaiveDate) -> Self {
        self.status = self.status.effective(self.due_date, today);
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateFeeDto {
    pub student_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub fee_type: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub amount: i64,
    pub due_date: NaiveDate,
}

/// Editable invoice fields. `status` accepts `pending` or `waived` only;
/// payment-driven statuses come from the payments endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFeeDto {
    #[validate(length(min = 1, max = 100))]
    pub fee_type: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub amount: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<FeeStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentDto {
    #[validate(range(min = 1))]
    pub amount: i64,
    /// Defaults to today
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    /// Filters on the effective status, so `overdue` includes unpaid fees past due
    pub status: Option<FeeStatus>,
    pub fee_type: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeSummaryParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
}

/// Totals over non-waived fees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct FeeSummary {
    pub fee_count: i64,
    pub total_billed: i64,
    pub total_paid: i64,
    pub outstanding: i64,
    pub overdue_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedFeesResponse {
    pub data: Vec<Fee>,
    pub meta: PaginationMeta,
}
