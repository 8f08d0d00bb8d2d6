use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::{AccessLevel, AppError, Module};
use edudesk_models::notices::{
    CreateNoticeDto, Notice, NoticeFilterParams, PaginatedNoticesResponse, UpdateNoticeDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{
    AuthUser, RequireNoticesAdmin, RequireNoticesRead, RequireNoticesWrite,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::notices::service::{NoticeReader, NoticeService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

pub(crate) fn reader_for(auth_user: &AuthUser) -> NoticeReader {
    if auth_user.can(Module::Notices, AccessLevel::Admin) {
        NoticeReader::Admin
    } else {
        NoticeReader::Role(auth_user.role())
    }
}

#[utoipa::path(
    post,
    path = "/api/notices",
    request_body = CreateNoticeDto,
    responses(
        (status = 201, description = "Notice published", body = Notice),
        (status = 403, description = "Missing write access to notices", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_notice(
    State(state): State<AppState>,
    RequireNoticesWrite(auth_user): RequireNoticesWrite,
    ValidatedJson(dto): ValidatedJson<CreateNoticeDto>,
) -> Result<(StatusCode, Json<Notice>), AppError> {
    let published_by = auth_user.user_id()?;
    let notice = NoticeService::create_notice(&state.db, published_by, dto).await?;
    Ok((StatusCode::CREATED, Json(notice)))
}

#[utoipa::path(
    get,
    path = "/api/notices",
    params(NoticeFilterParams),
    responses(
        (status = 200, description = "Notices visible to the caller", body = PaginatedNoticesResponse),
        (status = 403, description = "Missing read access to notices", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_notices(
    State(state): State<AppState>,
    RequireNoticesRead(auth_user): RequireNoticesRead,
    Query(filters): Query<NoticeFilterParams>,
) -> Result<Json<PaginatedNoticesResponse>, AppError> {
    Ok(Json(
        NoticeService::get_notices(&state.db, reader_for(&auth_user), filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/notices/{id}",
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice details", body = Notice),
        (status = 403, description = "Missing read access to notices", body = ErrorResponse),
        (status = 404, description = "Notice not found or not visible", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_notice(
    State(state): State<AppState>,
    RequireNoticesRead(auth_user): RequireNoticesRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Notice>, AppError> {
    Ok(Json(
        NoticeService::get_notice(&state.db, reader_for(&auth_user), id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/notices/{id}",
    params(("id" = Uuid, Path, description = "Notice ID")),
    request_body = UpdateNoticeDto,
    responses(
        (status = 200, description = "Notice updated", body = Notice),
        (status = 403, description = "Missing write access to notices", body = ErrorResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_notice(
    State(state): State<AppState>,
    RequireNoticesWrite(_auth_user): RequireNoticesWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateNoticeDto>,
) -> Result<Json<Notice>, AppError> {
    Ok(Json(NoticeService::update_notice(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/notices/{id}",
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 204, description = "Notice deleted"),
        (status = 403, description = "Missing admin access to notices", body = ErrorResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_notice(
    State(state): State<AppState>,
    RequireNoticesAdmin(_auth_user): RequireNoticesAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    NoticeService::delete_notice(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
