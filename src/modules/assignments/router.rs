use axum::{Router, routing::get};

use super::controller::{
    create_assignment, delete_assignment, get_assignment, get_assignments, update_assignment,
};
use crate::state::AppState;

pub fn init_assignments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_assignments).post(create_assignment))
        .route(
            "/{id}",
            get(get_assignment).put(update_assignment).delete(delete_assignment),
        )
}
