use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::calendar::{
    CalendarEvent, CalendarEventFilterParams, CreateCalendarEventDto,
    PaginatedCalendarEventsResponse, UpdateCalendarEventDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{RequireCalendarAdmin, RequireCalendarRead, RequireCalendarWrite};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::calendar::service::CalendarService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/calendar-events",
    request_body = CreateCalendarEventDto,
    responses(
        (status = 201, description = "Calendar event created", body = CalendarEvent),
        (status = 403, description = "Missing write access to calendar", body = ErrorResponse),
        (status = 422, description = "Validation error or end before start", body = ErrorResponse)
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_event(
    State(state): State<AppState>,
    RequireCalendarWrite(auth_user): RequireCalendarWrite,
    ValidatedJson(dto): ValidatedJson<CreateCalendarEventDto>,
) -> Result<(StatusCode, Json<CalendarEvent>), AppError> {
    let created_by = auth_user.user_id()?;
    let created = CalendarService::create_event(&state.db, created_by, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/calendar-events",
    params(CalendarEventFilterParams),
    responses(
        (status = 200, description = "Events overlapping the requested window", body = PaginatedCalendarEventsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing read access to calendar", body = ErrorResponse)
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_events(
    State(state): State<AppState>,
    RequireCalendarRead(_auth_user): RequireCalendarRead,
    Query(filters): Query<CalendarEventFilterParams>,
) -> Result<Json<PaginatedCalendarEventsResponse>, AppError> {
    Ok(Json(CalendarService::get_events(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/calendar-events/{id}",
    params(("id" = Uuid, Path, description = "Calendar event ID")),
    responses(
        (status = 200, description = "Calendar event details", body = CalendarEvent),
        (status = 403, description = "Missing read access to calendar", body = ErrorResponse),
        (status = 404, description = "Calendar event not found", body = ErrorResponse)
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_event(
    State(state): State<AppState>,
    RequireCalendarRead(_auth_user): RequireCalendarRead,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarEvent>, AppError> {
    Ok(Json(CalendarService::get_event(&state.db, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/calendar-events/{id}",
    params(("id" = Uuid, Path, description = "Calendar event ID")),
    request_body = UpdateCalendarEventDto,
    responses(
        (status = 200, description = "Calendar event updated", body = CalendarEvent),
        (status = 403, description = "Missing write access to calendar", body = ErrorResponse),
        (status = 404, description = "Calendar event not found", body = ErrorResponse),
        (status = 422, description = "Validation error or end before start", body = ErrorResponse)
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_event(
    State(state): State<AppState>,
    RequireCalendarWrite(_auth_user): RequireCalendarWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCalendarEventDto>,
) -> Result<Json<CalendarEvent>, AppError> {
    Ok(Json(CalendarService::update_event(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/calendar-events/{id}",
    params(("id" = Uuid, Path, description = "Calendar event ID")),
    responses(
        (status = 204, description = "Calendar event deleted"),
        (status = 403, description = "Missing admin access to calendar", body = ErrorResponse),
        (status = 404, description = "Calendar event not found", body = ErrorResponse)
    ),
    tag = "Calendar",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_event(
    State(state): State<AppState>,
    RequireCalendarAdmin(_auth_user): RequireCalendarAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CalendarService::delete_event(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
