use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_fee, delete_fee, get_fee, get_fee_summary, get_fees, record_payment, update_fee,
};
use crate::state::AppState;

pub fn init_fees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_fees).post(create_fee))
        .route("/summary", get(get_fee_summary))
        .route("/{id}", get(get_fee).put(update_fee).delete(delete_fee))
        .route("/{id}/payments", post(record_payment))
}
