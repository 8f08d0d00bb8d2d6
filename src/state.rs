use std::sync::Arc;

use edudesk_config::{CorsConfig, JwtConfig, StorageConfig};
use edudesk_core::{FileStorage, LocalFileStorage};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
    pub storage: Arc<dyn FileStorage>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("storage_config", &self.storage_config)
            .finish_non_exhaustive()
    }
}

/// Builds the shared state around an existing pool, reading the rest of the
/// configuration from the environment.
pub fn init_app_state(db: PgPool) -> AppState {
    let storage_config = StorageConfig::from_env();
    let storage = LocalFileStorage::new(
        storage_config.base_dir.clone(),
        storage_config.base_url.clone(),
        storage_config.max_upload_bytes,
    );

    AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        storage_config,
        storage: Arc::new(storage),
    }
}
