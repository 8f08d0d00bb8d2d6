use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    approve_admission, create_admission, delete_admission, get_admission, get_admissions,
    reject_admission, update_admission,
};
use crate::state::AppState;

pub fn init_admissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_admissions).post(create_admission))
        .route("/{id}/approve", post(approve_admission))
        .route("/{id}/reject", post(reject_admission))
        .route(
            "/{id}",
            get(get_admission).put(update_admission).delete(delete_admission),
        )
}
