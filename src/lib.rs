//! # EduDesk API
//!
//! School management REST API built with Axum and PostgreSQL. Every feature
//! area (students, attendance, fees, results, ...) is a *module* and every
//! user holds one of nine roles; a static table decides which access level
//! (`read`, `write`, `admin`) each role has on each module.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/      # AuthUser extractor, per-module access guards, row scoping
//! ├── modules/         # Feature modules (controller / service / router)
//! ├── docs.rs          # OpenAPI document
//! ├── logging.rs       # tracing setup and request logging
//! ├── metrics.rs       # Prometheus metrics
//! ├── router.rs        # Route tree and layers
//! ├── state.rs         # Shared application state
//! └── validator.rs     # ValidatedJson extractor
//! crates/
//! ├── edudesk-core     # AppError, roles, RBAC table, pagination, file storage
//! ├── edudesk-config   # Environment-driven configuration
//! ├── edudesk-db       # Pool, migrations, module catalogue sync
//! ├── edudesk-auth     # JWT claims and token handling
//! ├── edudesk-models   # Row types and DTOs
//! └── edudesk-cli      # Admin CLI (super admin, seeding)
//! ```
//!
//! Each feature module has the same layout:
//!
//! - `controller.rs`: HTTP handlers with OpenAPI annotations
//! - `service.rs`: SQL and business rules
//! - `router.rs`: Axum routes
//!
//! ## Access control
//!
//! Handlers take a guard such as `RequireFeesWrite`, which rejects callers
//! whose role lacks that level on the module with
//! `403 Access denied. Missing write access to fees`. Students and parents are
//! additionally restricted to their own (or their children's) rows through
//! [`middleware::scope::StudentScope`].
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`
//! - OpenAPI JSON: `http://localhost:3000/api-docs/openapi.json`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use edudesk_auth;
pub use edudesk_config;
pub use edudesk_core;
pub use edudesk_db;
pub use edudesk_models;
