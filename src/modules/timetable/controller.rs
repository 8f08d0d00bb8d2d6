use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::timetable::{
    CreateTimetableEntryDto, PaginatedTimetableResponse, TimetableEntry, TimetableFilterParams,
    UpdateTimetableEntryDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{RequireTimetableAdmin, RequireTimetableRead, RequireTimetableWrite};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::timetable::service::TimetableService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/timetable",
    request_body = CreateTimetableEntryDto,
    responses(
        (status = 201, description = "Timetable entry created", body = TimetableEntry),
        (status = 400, description = "Subject or teacher not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to timetable", body = ErrorResponse),
        (status = 409, description = "Class slot or teacher already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Timetable",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn create_entry(
    State(state): State<AppState>,
    RequireTimetableWrite(_auth_user): RequireTimetableWrite,
    ValidatedJson(dto): ValidatedJson<CreateTimetableEntryDto>,
) -> Result<(StatusCode, Json<TimetableEntry>), AppError> {
    let created = TimetableService::create_entry(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/timetable",
    params(TimetableFilterParams),
    responses(
        (status = 200, description = "Timetable ordered by day and period", body = PaginatedTimetableResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing read access to timetable", body = ErrorResponse)
    ),
    tag = "Timetable",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_entries(
    State(state): State<AppState>,
    RequireTimetableRead(_auth_user): RequireTimetableRead,
    Query(filters): Query<TimetableFilterParams>,
) -> Result<Json<PaginatedTimetableResponse>, AppError> {
    Ok(Json(TimetableService::get_entries(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/timetable/{id}",
    params(("id" = Uuid, Path, description = "Timetable entry ID")),
    responses(
        (status = 200, description = "Timetable entry details", body = TimetableEntry),
        (status = 403, description = "Missing read access to timetable", body = ErrorResponse),
        (status = 404, description = "Timetable entry not found", body = ErrorResponse)
    ),
    tag = "Timetable",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_entry(
    State(state): State<AppState>,
    RequireTimetableRead(_auth_user): RequireTimetableRead,
    Path(id): Path<Uuid>,
) -> Result<Json<TimetableEntry>, AppError> {
    Ok(Json(TimetableService::get_entry(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/timetable/{id}",
    params(("id" = Uuid, Path, description = "Timetable entry ID")),
    request_body = UpdateTimetableEntryDto,
    responses(
        (status = 200, description = "Timetable entry updated", body = TimetableEntry),
        (status = 403, description = "Missing write access to timetable", body = ErrorResponse),
        (status = 404, description = "Timetable entry not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Timetable",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_entry(
    State(state): State<AppState>,
    RequireTimetableWrite(_auth_user): RequireTimetableWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTimetableEntryDto>,
) -> Result<Json<TimetableEntry>, AppError> {
    Ok(Json(TimetableService::update_entry(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/timetable/{id}",
    params(("id" = Uuid, Path, description = "Timetable entry ID")),
    responses(
        (status = 204, description = "Timetable entry deleted"),
        (status = 403, description = "Missing admin access to timetable", body = ErrorResponse),
        (status = 404, description = "Timetable entry not found", body = ErrorResponse)
    ),
    tag = "Timetable",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_entry(
    State(state): State<AppState>,
    RequireTimetableAdmin(_auth_user): RequireTimetableAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TimetableService::delete_entry(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
