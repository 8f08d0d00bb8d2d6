use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::subjects::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, SubjectFilterParams, UpdateSubjectDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{RequireSubjectsAdmin, RequireSubjectsRead, RequireSubjectsWrite};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Teacher not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to subjects", body = ErrorResponse),
        (status = 409, description = "Subject code already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_subject(
    State(state): State<AppState>,
    RequireSubjectsWrite(_auth_user): RequireSubjectsWrite,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let created = SubjectService::create_subject(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/subjects",
    params(SubjectFilterParams),
    responses(
        (status = 200, description = "List of subjects", body = PaginatedSubjectsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing read access to subjects", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_subjects(
    State(state): State<AppState>,
    RequireSubjectsRead(_auth_user): RequireSubjectsRead,
    Query(filters): Query<SubjectFilterParams>,
) -> Result<Json<PaginatedSubjectsResponse>, AppError> {
    Ok(Json(SubjectService::get_subjects(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject details", body = Subject),
        (status = 403, description = "Missing read access to subjects", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_subject(
    State(state): State<AppState>,
    RequireSubjectsRead(_auth_user): RequireSubjectsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(SubjectService::get_subject(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    request_body = UpdateSubjectDto,
    responses(
        (status = 200, description = "Subject updated", body = Subject),
        (status = 403, description = "Missing write access to subjects", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_subject(
    State(state): State<AppState>,
    RequireSubjectsWrite(_auth_user): RequireSubjectsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSubjectDto>,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(SubjectService::update_subject(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 204, description = "Subject deleted"),
        (status = 403, description = "Missing admin access to subjects", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_subject(
    State(state): State<AppState>,
    RequireSubjectsAdmin(_auth_user): RequireSubjectsAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    SubjectService::delete_subject(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
