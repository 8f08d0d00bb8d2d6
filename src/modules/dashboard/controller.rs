use axum::{Json, extract::State};
use edudesk_core::AppError;
use edudesk_models::dashboard::DashboardResponse;
use tracing::instrument;

use crate::middleware::auth::RequireDashboardRead;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::dashboard::service::DashboardService;
use crate::state::AppState;

/// Role-aware overview; only blocks for readable modules are included.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard for the current user", body = DashboardResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing read access to dashboard", body = ErrorResponse)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    RequireDashboardRead(auth_user): RequireDashboardRead,
) -> Result<Json<DashboardResponse>, AppError> {
    Ok(Json(
        DashboardService::get_dashboard(&state.db, &auth_user).await?,
    ))
}
