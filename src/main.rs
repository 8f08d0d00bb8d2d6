use anyhow::Context;
use dotenvy::dotenv;
use edudesk::logging::init_tracing;
use edudesk::metrics::{init_metrics, metrics_router, set_metrics_enabled};
use edudesk::router::init_router;
use edudesk::state::init_app_state;
use edudesk_config::{DatabaseConfig, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config.log_dir)?;

    set_metrics_enabled(server_config.metrics_enabled);
    let metrics_handle = init_metrics()?;

    let db = edudesk_db::init_db_pool(&DatabaseConfig::from_env()).await?;
    edudesk_db::run_migrations(&db).await?;
    let report = edudesk_db::sync_modules(&db).await?;
    tracing::info!(
        modules = report.modules,
        role_modules = report.role_modules,
        "Module catalogue in sync"
    );

    let state = init_app_state(db);
    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_router(handle));
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(%address, "Server running");
    tracing::info!("Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
