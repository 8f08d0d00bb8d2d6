//! User accounts.

use chrono::{DateTime, Utc};
use edudesk_core::serde::deserialize_optional_bool;
use edudesk_core::{PaginationMeta, PaginationParams, Role};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Column list matching [`User`]; the password hash is never selected into it.
pub const USER_COLUMNS: &str =
    "id, first_name, last_name, email, role, phone, is_active, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// New password; re-hashed before storage
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub role: Option<Role>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    /// Matches first name, last name or email
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateUserDto {
        CreateUserDto {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            email: "ada@school.test".to_string(),
            password: "password123".to_string(),
            role: Role::Accountant,
            phone: None,
        }
    }

    #[test]
    fn test_create_user_dto_validation() {
        assert!(valid_create().validate().is_ok());

        let bad_email = CreateUserDto {
            email: "nope".to_string(),
            ..valid_create()
        };
        assert!(bad_email.validate().is_err());

        let short_password = CreateUserDto {
            password: "short".to_string(),
            ..valid_create()
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_update_user_dto_allows_empty() {
        assert!(UpdateUserDto::default().validate().is_ok());
    }

    #[test]
    fn test_create_user_requires_known_role() {
        let json = r#"{"first_name":"A","last_name":"B","email":"a@b.co","password":"password123","role":"janitor"}"#;
        assert!(serde_json::from_str::<CreateUserDto>(json).is_err());
    }
}
