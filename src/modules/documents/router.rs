use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_document, delete_document, get_document, get_documents, update_document, upload_document,
};
use crate::state::AppState;

pub fn init_documents_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_documents).post(create_document))
        .route("/upload", post(upload_document))
        .route(
            "/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
}
