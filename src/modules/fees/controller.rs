use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::fees::{
    CreateFeeDto, Fee, FeeFilterParams, FeeSummary, FeeSummaryParams, PaginatedFeesResponse,
    RecordPaymentDto, UpdateFeeDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{RequireFeesAdmin, RequireFeesRead, RequireFeesWrite};
use crate::middleware::scope::StudentScope;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::fees::service::FeeService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/fees",
    request_body = CreateFeeDto,
    responses(
        (status = 201, description = "Fee created", body = Fee),
        (status = 400, description = "Student not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to fees", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_fee(
    State(state): State<AppState>,
    RequireFeesWrite(_auth_user): RequireFeesWrite,
    ValidatedJson(dto): ValidatedJson<CreateFeeDto>,
) -> Result<(StatusCode, Json<Fee>), AppError> {
    let fee = FeeService::create_fee(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(fee)))
}

#[utoipa::path(
    get,
    path = "/api/fees",
    params(FeeFilterParams),
    responses(
        (status = 200, description = "Fees with read-time status", body = PaginatedFeesResponse),
        (status = 403, description = "Missing read access to fees", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_fees(
    State(state): State<AppState>,
    RequireFeesRead(auth_user): RequireFeesRead,
    Query(filters): Query<FeeFilterParams>,
) -> Result<Json<PaginatedFeesResponse>, AppError> {
    let scope = StudentScope::for_user(&state.db, &auth_user).await?;
    Ok(Json(FeeService::get_fees(&state.db, &scope, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/fees/summary",
    params(FeeSummaryParams),
    responses(
        (status = 200, description = "Totals over non-waived fees", body = FeeSummary),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_fee_summary(
    State(state): State<AppState>,
    RequireFeesRead(auth_user): RequireFeesRead,
    Query(params): Query<FeeSummaryParams>,
) -> Result<Json<FeeSummary>, AppError> {
    let scope = StudentScope::for_user(&state.db, &auth_user).await?;
    if let Some(student_id) = params.student_id {
        scope.ensure(student_id)?;
    }
    Ok(Json(
        FeeService::get_summary(&state.db, &scope, params.student_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/fees/{id}",
    params(("id" = Uuid, Path, description = "Fee ID")),
    responses(
        (status = 200, description = "Fee details", body = Fee),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_fee(
    State(state): State<AppState>,
    RequireFeesRead(auth_user): RequireFeesRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Fee>, AppError> {
    let fee = FeeService::get_fee(&state.db, id).await?;
    StudentScope::for_user(&state.db, &auth_user)
        .await?
        .ensure(fee.student_id)?;
    Ok(Json(fee))
}

#[utoipa::path(
    put,
    path = "/api/fees/{id}",
    params(("id" = Uuid, Path, description = "Fee ID")),
    request_body = UpdateFeeDto,
    responses(
        (status = 200, description = "Fee updated", body = Fee),
        (status = 400, description = "Amount below what was already paid", body = ErrorResponse),
        (status = 403, description = "Missing write access to fees", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse),
        (status = 422, description = "Validation error or unsupported status", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_fee(
    State(state): State<AppState>,
    RequireFeesWrite(_auth_user): RequireFeesWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateFeeDto>,
) -> Result<Json<Fee>, AppError> {
    Ok(Json(FeeService::update_fee(&state.db, id, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/fees/{id}/payments",
    params(("id" = Uuid, Path, description = "Fee ID")),
    request_body = RecordPaymentDto,
    responses(
        (status = 200, description = "Payment recorded", body = Fee),
        (status = 400, description = "Payment exceeds the balance, or the fee is waived", body = ErrorResponse),
        (status = 403, description = "Missing write access to fees", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn record_payment(
    State(state): State<AppState>,
    RequireFeesWrite(_auth_user): RequireFeesWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RecordPaymentDto>,
) -> Result<Json<Fee>, AppError> {
    Ok(Json(FeeService::record_payment(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/fees/{id}",
    params(("id" = Uuid, Path, description = "Fee ID")),
    responses(
        (status = 204, description = "Fee deleted"),
        (status = 403, description = "Missing admin access to fees", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_fee(
    State(state): State<AppState>,
    RequireFeesAdmin(_auth_user): RequireFeesAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FeeService::delete_fee(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
