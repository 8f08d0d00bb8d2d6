use axum::{
    Json,
    extract::{Query, State},
};
use edudesk_core::AppError;
use edudesk_models::permissions::{
    ModuleAccess, ModuleRecord, MyPermissionsResponse, PermissionCheckParams,
    PermissionCheckResponse, RoleInfo, RolePermissions,
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::permissions::service::PermissionService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/permissions/roles",
    responses(
        (status = 200, description = "Every role with its display name and level", body = Vec<RoleInfo>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_roles(_auth_user: AuthUser) -> Json<Vec<RoleInfo>> {
    Json(PermissionService::roles())
}

#[utoipa::path(
    get,
    path = "/api/permissions/modules",
    responses(
        (status = 200, description = "Module catalogue", body = Vec<ModuleRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_modules(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<ModuleRecord>>, AppError> {
    Ok(Json(PermissionService::list_modules(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/permissions/matrix",
    responses(
        (status = 200, description = "Role by module access table", body = Vec<RolePermissions>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_matrix(_auth_user: AuthUser) -> Json<Vec<RolePermissions>> {
    Json(RolePermissions::matrix())
}

#[utoipa::path(
    get,
    path = "/api/permissions/me",
    responses(
        (status = 200, description = "Caller's accessible modules", body = MyPermissionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_my_permissions(auth_user: AuthUser) -> Json<MyPermissionsResponse> {
    let role = auth_user.role();
    Json(MyPermissionsResponse {
        role,
        modules: ModuleAccess::for_role(role),
    })
}

#[utoipa::path(
    get,
    path = "/api/permissions/check",
    params(PermissionCheckParams),
    responses(
        (status = 200, description = "Whether the role has the level on the module", body = PermissionCheckResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(_auth_user))]
pub async fn check_permission(
    _auth_user: AuthUser,
    Query(params): Query<PermissionCheckParams>,
) -> Json<PermissionCheckResponse> {
    Json(PermissionCheckResponse {
        allowed: PermissionService::check(&params),
    })
}
