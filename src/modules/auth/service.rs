use edudesk_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use edudesk_config::JwtConfig;
use edudesk_core::{AppError, hash_password, verify_password};
use edudesk_models::auth::{ChangePasswordRequest, LoginRequest, LoginResponse};
use edudesk_models::permissions::ModuleAccess;
use edudesk_models::users::{USER_COLUMNS, User};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::{track_login_failure, track_login_success};
use crate::modules::users::service::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let record = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {}, password FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(dto.email.trim())
        .fetch_optional(db)
        .await?;

        let Some(record) = record else {
            track_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&dto.password, &record.password)? {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !record.user.is_active {
            track_login_failure("inactive");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let response = Self::issue_tokens(record.user, jwt_config)?;
        track_login_success(response.user.role.as_str());
        Ok(response)
    }

    #[instrument(skip_all)]
    pub async fn refresh_tokens(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired refresh token".to_string()))?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| AppError::unauthorized("Invalid or expired refresh token".to_string()))?;

        Self::issue_tokens(user, jwt_config)
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: Uuid,
        dto: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let current_hash =
            sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &current_hash)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_hash)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        let user = UserService::get_user(db, user_id).await?;
        if !user.is_active {
            return Err(AppError::unauthorized("Account is inactive".to_string()));
        }
        Ok(user)
    }

    fn issue_tokens(user: User, jwt_config: &JwtConfig) -> Result<LoginResponse, AppError> {
        let access_token = create_access_token(user.id, &user.email, user.role, jwt_config)?;
        let refresh_token = create_refresh_token(user.id, &user.email, jwt_config)?;
        let modules = ModuleAccess::for_role(user.role);

        Ok(LoginResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
            modules,
        })
    }
}
