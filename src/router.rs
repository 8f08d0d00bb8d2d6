use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::{
    admissions::init_admissions_router, assignments::init_assignments_router,
    attendance::init_attendance_router, auth::init_auth_router, calendar::init_calendar_router,
    dashboard::init_dashboard_router, documents::init_documents_router, fees::init_fees_router,
    notices::init_notices_router, permissions::init_permissions_router,
    results::init_results_router, students::init_students_router, subjects::init_subjects_router,
    submissions::init_submissions_router, teachers::init_teachers_router,
    timetable::init_timetable_router, users::init_users_router,
};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

/// Headroom on top of the file cap for multipart boundaries and text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "Health"
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", init_auth_router())
        .nest("/permissions", init_permissions_router())
        .nest("/dashboard", init_dashboard_router())
        .nest("/users", init_users_router())
        .nest("/students", init_students_router())
        .nest("/teachers", init_teachers_router())
        .nest("/subjects", init_subjects_router())
        .nest("/attendance", init_attendance_router())
        .nest("/fees", init_fees_router())
        .nest("/timetable", init_timetable_router())
        .nest("/results", init_results_router())
        .nest("/documents", init_documents_router())
        .nest("/notices", init_notices_router())
        .nest("/assignments", init_assignments_router())
        .nest("/submissions", init_submissions_router())
        .nest("/calendar-events", init_calendar_router())
        .nest("/admissions", init_admissions_router())
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let body_limit = state.storage_config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest_service("/files", ServeDir::new(&state.storage_config.base_dir))
        .nest("/api", api_router())
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
