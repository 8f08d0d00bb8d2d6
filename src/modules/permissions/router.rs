use axum::{Router, routing::get};

use super::controller::{check_permission, get_matrix, get_modules, get_my_permissions, get_roles};
use crate::state::AppState;

pub fn init_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/roles", get(get_roles))
        .route("/modules", get(get_modules))
        .route("/matrix", get(get_matrix))
        .route("/me", get(get_my_permissions))
        .route("/check", get(check_permission))
}
