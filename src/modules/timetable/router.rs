use axum::{Router, routing::get};

use super::controller::{create_entry, delete_entry, get_entries, get_entry, update_entry};
use crate::state::AppState;

pub fn init_timetable_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_entries).post(create_entry))
        .route(
            "/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}
