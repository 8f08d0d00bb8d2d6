use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::assignments::{
    Assignment, AssignmentFilterParams, CreateAssignmentDto, PaginatedAssignmentsResponse,
    UpdateAssignmentDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{
    RequireAssignmentsAdmin, RequireAssignmentsRead, RequireAssignmentsWrite,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::assignments::service::AssignmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Subject or teacher not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to assignments", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireAssignmentsWrite(_auth_user): RequireAssignmentsWrite,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let created = AssignmentService::create_assignment(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/assignments",
    params(AssignmentFilterParams),
    responses(
        (status = 200, description = "Assignments, latest due date first", body = PaginatedAssignmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing read access to assignments", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_assignments(
    State(state): State<AppState>,
    RequireAssignmentsRead(_auth_user): RequireAssignmentsRead,
    Query(filters): Query<AssignmentFilterParams>,
) -> Result<Json<PaginatedAssignmentsResponse>, AppError> {
    Ok(Json(AssignmentService::get_assignments(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment details", body = Assignment),
        (status = 403, description = "Missing read access to assignments", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_assignment(
    State(state): State<AppState>,
    RequireAssignmentsRead(_auth_user): RequireAssignmentsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Assignment>, AppError> {
    Ok(Json(AssignmentService::get_assignment(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 403, description = "Missing write access to assignments", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireAssignmentsWrite(_auth_user): RequireAssignmentsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<Assignment>, AppError> {
    Ok(Json(AssignmentService::update_assignment(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 403, description = "Missing admin access to assignments", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireAssignmentsAdmin(_auth_user): RequireAssignmentsAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AssignmentService::delete_assignment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
