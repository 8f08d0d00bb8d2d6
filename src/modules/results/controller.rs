use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::results::{
    CreateResultDto, ExamResult, PaginatedResultsResponse, ReportCard, ReportCardParams,
    ResultFilterParams, UpdateResultDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{RequireResultsAdmin, RequireResultsRead, RequireResultsWrite};
use crate::middleware::scope::StudentScope;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::results::service::ResultService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/results",
    request_body = CreateResultDto,
    responses(
        (status = 201, description = "Result recorded with computed grade", body = ExamResult),
        (status = 400, description = "Student or subject not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to results", body = ErrorResponse),
        (status = 409, description = "Result already recorded for this exam", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_result(
    State(state): State<AppState>,
    RequireResultsWrite(_auth_user): RequireResultsWrite,
    ValidatedJson(dto): ValidatedJson<CreateResultDto>,
) -> Result<(StatusCode, Json<ExamResult>), AppError> {
    let result = ResultService::create_result(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/results",
    params(ResultFilterParams),
    responses(
        (status = 200, description = "Results visible to the caller", body = PaginatedResultsResponse),
        (status = 403, description = "Missing read access to results", body = ErrorResponse)
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_results(
    State(state): State<AppState>,
    RequireResultsRead(auth_user): RequireResultsRead,
    Query(filters): Query<ResultFilterParams>,
) -> Result<Json<PaginatedResultsResponse>, AppError> {
    let scope = StudentScope::for_user(&state.db, &auth_user).await?;
    Ok(Json(
        ResultService::get_results(&state.db, &scope, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/results/report-card/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ReportCardParams
    ),
    responses(
        (status = 200, description = "Per-subject marks with overall grade", body = ReportCard),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_report_card(
    State(state): State<AppState>,
    RequireResultsRead(auth_user): RequireResultsRead,
    Path(student_id): Path<Uuid>,
    Query(params): Query<ReportCardParams>,
) -> Result<Json<ReportCard>, AppError> {
    StudentScope::for_user(&state.db, &auth_user)
        .await?
        .ensure(student_id)?;
    Ok(Json(
        ResultService::get_report_card(&state.db, student_id, params).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/results/{id}",
    params(("id" = Uuid, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result details", body = ExamResult),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse)
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_result(
    State(state): State<AppState>,
    RequireResultsRead(auth_user): RequireResultsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<ExamResult>, AppError> {
    let result = ResultService::get_result(&state.db, id).await?;
    StudentScope::for_user(&state.db, &auth_user)
        .await?
        .ensure(result.student_id)?;
    Ok(Json(result))
}

#[utoipa::path(
    put,
    path = "/api/results/{id}",
    params(("id" = Uuid, Path, description = "Result ID")),
    request_body = UpdateResultDto,
    responses(
        (status = 200, description = "Result updated and regraded", body = ExamResult),
        (status = 403, description = "Missing write access to results", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse),
        (status = 409, description = "Result already recorded for this exam", body = ErrorResponse),
        (status = 422, description = "Marks exceed maximum", body = ErrorResponse)
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_result(
    State(state): State<AppState>,
    RequireResultsWrite(_auth_user): RequireResultsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateResultDto>,
) -> Result<Json<ExamResult>, AppError> {
    Ok(Json(ResultService::update_result(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/results/{id}",
    params(("id" = Uuid, Path, description = "Result ID")),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 403, description = "Missing admin access to results", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse)
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_result(
    State(state): State<AppState>,
    RequireResultsAdmin(_auth_user): RequireResultsAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ResultService::delete_result(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
