use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, TeacherFilterParams, UpdateTeacherDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{RequireTeachersAdmin, RequireTeachersRead, RequireTeachersWrite};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = Teacher),
        (status = 403, description = "Missing write access to teachers", body = ErrorResponse),
        (status = 409, description = "Employee ID or email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireTeachersWrite(_auth_user): RequireTeachersWrite,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let created = TeacherService::create_teacher(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(TeacherFilterParams),
    responses(
        (status = 200, description = "List of teachers", body = PaginatedTeachersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing read access to teachers", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_teachers(
    State(state): State<AppState>,
    RequireTeachersRead(_auth_user): RequireTeachersRead,
    Query(filters): Query<TeacherFilterParams>,
) -> Result<Json<PaginatedTeachersResponse>, AppError> {
    Ok(Json(TeacherService::get_teachers(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = Teacher),
        (status = 403, description = "Missing read access to teachers", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_teacher(
    State(state): State<AppState>,
    RequireTeachersRead(_auth_user): RequireTeachersRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(TeacherService::get_teacher(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 403, description = "Missing write access to teachers", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    RequireTeachersWrite(_auth_user): RequireTeachersWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(TeacherService::update_teacher(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 403, description = "Missing admin access to teachers", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    RequireTeachersAdmin(_auth_user): RequireTeachersAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TeacherService::delete_teacher(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
