//! Process-level settings: HTTP bind address, database pool sizing,
//! metrics toggle and log directory.

use crate::env::{flag_or, parse_or, string_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub metrics_enabled: bool,
    pub log_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            metrics_enabled: true,
            log_dir: "storage/logs".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: string_or("SERVER_HOST", &defaults.host),
            port: parse_or("SERVER_PORT", defaults.port),
            metrics_enabled: flag_or("METRICS_ENABLED", defaults.metrics_enabled),
            log_dir: string_or("LOG_DIR", &defaults.log_dir),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS),
        }
    }
}
