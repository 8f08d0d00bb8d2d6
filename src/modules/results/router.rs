use axum::{Router, routing::get};

use super::controller::{
    create_result, delete_result, get_report_card, get_result, get_results, update_result,
};
use crate::state::AppState;

pub fn init_results_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_results).post(create_result))
        .route("/report-card/{student_id}", get(get_report_card))
        .route(
            "/{id}",
            get(get_result).put(update_result).delete(delete_result),
        )
}
