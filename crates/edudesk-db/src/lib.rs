//! # EduDesk DB
//!
//! PostgreSQL pool construction and the embedded schema migrations
//! (the workspace `migrations/` directory), plus [`sync_modules`], which
//! mirrors the static RBAC table into the `modules` and `role_modules` tables.
//!
//! ```ignore
//! let pool = edudesk_db::init_db_pool(&DatabaseConfig::from_env()).await?;
//! edudesk_db::run_migrations(&pool).await?;
//! ```

mod modules;

use std::time::Duration;

use anyhow::Context;
use edudesk_config::DatabaseConfig;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub use modules::{SyncReport, sync_modules};
pub use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connects to `DATABASE_URL` with the configured pool size.
pub async fn init_db_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let url = config
        .url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}
