//! # EduDesk Core
//!
//! Foundational types shared by every EduDesk crate:
//!
//! - [`errors`]: [`AppError`] and its HTTP response conversion
//! - [`roles`]: the nine user [`Role`]s
//! - [`permissions`]: the static role → module → access-level table
//! - [`pagination`]: list pagination parameters and metadata
//! - [`password`]: bcrypt hashing and verification
//! - [`file_storage`]: document storage abstraction
//! - [`serde`]: lenient query-string deserializers
//! - [`search`]: escaped `ILIKE` patterns for `?search=`

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod search;
pub mod serde;

pub use errors::AppError;
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use permissions::{AccessLevel, Module};
pub use roles::Role;
