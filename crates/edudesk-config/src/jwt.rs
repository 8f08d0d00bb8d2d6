use crate::env::{parse_or, string_or};

pub const DEFAULT_ACCESS_EXPIRY: i64 = 3600;
pub const DEFAULT_REFRESH_EXPIRY: i64 = 604_800;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = string_or("JWT_SECRET", "change-me-edudesk-development-secret");
        if std::env::var("JWT_SECRET").is_err() {
            tracing::warn!("JWT_SECRET is not set, using the development secret");
        }

        Self {
            secret,
            access_token_expiry: parse_or("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY),
            refresh_token_expiry: parse_or("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY),
        }
    }
}
