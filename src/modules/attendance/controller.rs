use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::attendance::{
    Attendance, AttendanceFilterParams, AttendanceSummary, AttendanceSummaryParams,
    BulkAttendanceDto, BulkAttendanceResponse, CreateAttendanceDto, PaginatedAttendanceResponse,
    UpdateAttendanceDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{
    RequireAttendanceAdmin, RequireAttendanceRead, RequireAttendanceWrite,
};
use crate::middleware::scope::StudentScope;
use crate::modules::attendance::service::AttendanceService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendanceDto,
    responses(
        (status = 201, description = "Attendance marked", body = Attendance),
        (status = 400, description = "Student not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to attendance", body = ErrorResponse),
        (status = 409, description = "Already marked for this student and date", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_attendance(
    State(state): State<AppState>,
    RequireAttendanceWrite(auth_user): RequireAttendanceWrite,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let record = AttendanceService::create_attendance(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    post,
    path = "/api/attendance/bulk",
    request_body = BulkAttendanceDto,
    responses(
        (status = 200, description = "Attendance stored for every listed student", body = BulkAttendanceResponse),
        (status = 400, description = "One or more students not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to attendance", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn bulk_mark_attendance(
    State(state): State<AppState>,
    RequireAttendanceWrite(auth_user): RequireAttendanceWrite,
    ValidatedJson(dto): ValidatedJson<BulkAttendanceDto>,
) -> Result<Json<BulkAttendanceResponse>, AppError> {
    let response = AttendanceService::bulk_mark(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilterParams),
    responses(
        (status = 200, description = "Attendance records", body = PaginatedAttendanceResponse),
        (status = 403, description = "Missing read access to attendance", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_attendance_list(
    State(state): State<AppState>,
    RequireAttendanceRead(auth_user): RequireAttendanceRead,
    Query(filters): Query<AttendanceFilterParams>,
) -> Result<Json<PaginatedAttendanceResponse>, AppError> {
    let scope = StudentScope::for_user(&state.db, &auth_user).await?;
    Ok(Json(
        AttendanceService::get_attendance_list(&state.db, &scope, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record", body = Attendance),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_attendance(
    State(state): State<AppState>,
    RequireAttendanceRead(auth_user): RequireAttendanceRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Attendance>, AppError> {
    let record = AttendanceService::get_attendance(&state.db, id).await?;
    StudentScope::for_user(&state.db, &auth_user)
        .await?
        .ensure(record.student_id)?;
    Ok(Json(record))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Attendance updated", body = Attendance),
        (status = 403, description = "Missing write access to attendance", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_attendance(
    State(state): State<AppState>,
    RequireAttendanceWrite(auth_user): RequireAttendanceWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<Attendance>, AppError> {
    let record =
        AttendanceService::update_attendance(&state.db, id, auth_user.user_id()?, dto).await?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 204, description = "Attendance record deleted"),
        (status = 403, description = "Missing admin access to attendance", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    RequireAttendanceAdmin(_auth_user): RequireAttendanceAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AttendanceService::delete_attendance(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/attendance/summary/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        AttendanceSummaryParams
    ),
    responses(
        (status = 200, description = "Counts per status and attendance percentage", body = AttendanceSummary),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_attendance_summary(
    State(state): State<AppState>,
    RequireAttendanceRead(auth_user): RequireAttendanceRead,
    Path(student_id): Path<Uuid>,
    Query(params): Query<AttendanceSummaryParams>,
) -> Result<Json<AttendanceSummary>, AppError> {
    StudentScope::for_user(&state.db, &auth_user)
        .await?
        .ensure(student_id)?;
    Ok(Json(
        AttendanceService::get_summary(&state.db, student_id, params).await?,
    ))
}
