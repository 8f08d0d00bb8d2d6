//! # EduDesk Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`cors`]: allowed browser origins
//! - [`storage`]: where uploaded documents live and how they are served
//! - [`server`]: bind address, pool size, metrics and log settings
//!
//! Every `from_env()` falls back to a default when a variable is missing or
//! does not parse.
//!
//! # Example
//!
//! ```ignore
//! use edudesk_config::{CorsConfig, JwtConfig, ServerConfig, StorageConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server = ServerConfig::from_env();
//! println!("listening on {}", server.bind_address());
//! ```

pub mod cors;
pub mod jwt;
pub mod server;
pub mod storage;

mod env;

pub use cors::CorsConfig;
pub use env::parse_flag;
pub use jwt::JwtConfig;
pub use server::{DatabaseConfig, ServerConfig};
pub use storage::StorageConfig;
