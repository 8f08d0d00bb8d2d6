use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{change_password, get_me, login_user, refresh_token};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/me", get(get_me))
        .route("/change-password", post(change_password))
}
