use axum::{Router, routing::get};

use super::controller::{create_notice, delete_notice, get_notice, get_notices, update_notice};
use crate::state::AppState;

pub fn init_notices_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notices).post(create_notice))
        .route(
            "/{id}",
            get(get_notice).put(update_notice).delete(delete_notice),
        )
}
