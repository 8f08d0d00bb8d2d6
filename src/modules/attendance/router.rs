use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    bulk_mark_attendance, create_attendance, delete_attendance, get_attendance, get_attendance_list,
    get_attendance_summary, update_attendance,
};
use crate::state::AppState;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_attendance_list).post(create_attendance))
        .route("/bulk", post(bulk_mark_attendance))
        .route("/summary/{student_id}", get(get_attendance_summary))
        .route(
            "/{id}",
            get(get_attendance)
                .put(update_attendance)
                .delete(delete_attendance),
        )
}
