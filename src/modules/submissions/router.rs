use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_submission, delete_submission, get_submission, get_submissions, grade_submission,
    update_submission,
};
use crate::state::AppState;

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_submissions).post(create_submission))
        .route("/{id}/grade", put(grade_submission))
        .route(
            "/{id}",
            get(get_submission)
                .put(update_submission)
                .delete(delete_submission),
        )
}
