//! Request extractors for authentication and authorization.
//!
//! - [`auth`]: [`auth::AuthUser`] validates the bearer token; the
//!   `Require<Module><Level>` extractors additionally check the caller's role
//!   against the static permission table.
//! - [`scope`]: narrows student-linked data to what a student or parent may see.
//!
//! ```ignore
//! use crate::middleware::auth::RequireFeesWrite;
//!
//! async fn record_payment(RequireFeesWrite(auth_user): RequireFeesWrite) { /* ... */ }
//! ```

pub mod auth;
pub mod scope;
