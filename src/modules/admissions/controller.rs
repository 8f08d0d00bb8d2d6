use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::admissions::{
    Admission, AdmissionFilterParams, ApprovalResponse, ApproveAdmissionDto, CreateAdmissionDto,
    PaginatedAdmissionsResponse, RejectAdmissionDto, UpdateAdmissionDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{
    RequireAdmissionsAdmin, RequireAdmissionsRead, RequireAdmissionsWrite,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::admissions::service::AdmissionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/admissions",
    request_body = CreateAdmissionDto,
    responses(
        (status = 201, description = "Admission created", body = Admission),
        (status = 403, description = "Missing write access to admissions", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_admission(
    State(state): State<AppState>,
    RequireAdmissionsWrite(_auth_user): RequireAdmissionsWrite,
    ValidatedJson(dto): ValidatedJson<CreateAdmissionDto>,
) -> Result<(StatusCode, Json<Admission>), AppError> {
    let created = AdmissionService::create_admission(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/admissions",
    params(AdmissionFilterParams),
    responses(
        (status = 200, description = "Applications, newest first", body = PaginatedAdmissionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing read access to admissions", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_admissions(
    State(state): State<AppState>,
    RequireAdmissionsRead(_auth_user): RequireAdmissionsRead,
    Query(filters): Query<AdmissionFilterParams>,
) -> Result<Json<PaginatedAdmissionsResponse>, AppError> {
    Ok(Json(AdmissionService::get_admissions(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/admissions/{id}",
    params(("id" = Uuid, Path, description = "Admission ID")),
    responses(
        (status = 200, description = "Admission details", body = Admission),
        (status = 403, description = "Missing read access to admissions", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_admission(
    State(state): State<AppState>,
    RequireAdmissionsRead(_auth_user): RequireAdmissionsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Admission>, AppError> {
    Ok(Json(AdmissionService::get_admission(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/admissions/{id}",
    params(("id" = Uuid, Path, description = "Admission ID")),
    request_body = UpdateAdmissionDto,
    responses(
        (status = 200, description = "Admission updated", body = Admission),
        (status = 403, description = "Missing write access to admissions", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse),
        (status = 409, description = "Application already decided", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_admission(
    State(state): State<AppState>,
    RequireAdmissionsWrite(_auth_user): RequireAdmissionsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAdmissionDto>,
) -> Result<Json<Admission>, AppError> {
    Ok(Json(AdmissionService::update_admission(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admissions/{id}",
    params(("id" = Uuid, Path, description = "Admission ID")),
    responses(
        (status = 204, description = "Admission deleted"),
        (status = 403, description = "Missing admin access to admissions", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_admission(
    State(state): State<AppState>,
    RequireAdmissionsAdmin(_auth_user): RequireAdmissionsAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AdmissionService::delete_admission(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admissions/{id}/approve",
    params(("id" = Uuid, Path, description = "Admission ID")),
    request_body = ApproveAdmissionDto,
    responses(
        (status = 200, description = "Student created and application approved", body = ApprovalResponse),
        (status = 400, description = "Parent user not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to admissions", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse),
        (status = 409, description = "Application already decided or admission number taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn approve_admission(
    State(state): State<AppState>,
    RequireAdmissionsWrite(auth_user): RequireAdmissionsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ApproveAdmissionDto>,
) -> Result<Json<ApprovalResponse>, AppError> {
    let reviewed_by = auth_user.user_id()?;
    Ok(Json(
        AdmissionService::approve_admission(&state.db, id, reviewed_by, dto).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/admissions/{id}/reject",
    params(("id" = Uuid, Path, description = "Admission ID")),
    request_body = RejectAdmissionDto,
    responses(
        (status = 200, description = "Application rejected", body = Admission),
        (status = 403, description = "Missing write access to admissions", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse),
        (status = 409, description = "Application already decided", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn reject_admission(
    State(state): State<AppState>,
    RequireAdmissionsWrite(auth_user): RequireAdmissionsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RejectAdmissionDto>,
) -> Result<Json<Admission>, AppError> {
    let reviewed_by = auth_user.user_id()?;
    Ok(Json(
        AdmissionService::reject_admission(&state.db, id, reviewed_by, dto).await?,
    ))
}
