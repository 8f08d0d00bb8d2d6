use axum::{Router, routing::get};

use super::controller::{create_event, delete_event, get_event, get_events, update_event};
use crate::state::AppState;

pub fn init_calendar_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}
