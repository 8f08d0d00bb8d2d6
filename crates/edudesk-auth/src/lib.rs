//! # EduDesk Auth
//!
//! JWT claims and token helpers.
//!
//! - **Access token** ([`Claims`]): carries the user id, email and [`Role`];
//!   every authorization decision is made from the role claim.
//! - **Refresh token** ([`RefreshTokenClaims`]): long lived, exchanged for a
//!   fresh pair at `/api/auth/refresh`.
//!
//! [`Role`]: edudesk_core::Role

pub mod claims;
pub mod jwt;

pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
