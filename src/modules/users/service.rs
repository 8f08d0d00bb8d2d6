use edudesk_core::errors::map_unique_violation;
use edudesk_core::search::search_pattern;
use edudesk_core::{AppError, PaginationMeta, Role, hash_password};
use edudesk_models::users::{
    CreateUserDto, PaginatedUsersResponse, USER_COLUMNS, UpdateUserDto, User, UserFilterParams,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::track_user_created;

const DUPLICATE_EMAIL: &str = "A user with this email already exists";

pub struct UserService;

impl UserService {
    /// Only a super admin may create, promote to, modify or delete a super admin.
    pub fn ensure_can_manage(actor: Role, target: Role) -> Result<(), AppError> {
        if target == Role::SuperAdmin && actor != Role::SuperAdmin {
            return Err(AppError::forbidden(
                "Only a super admin can manage super admin accounts".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(db, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create_user(
        db: &PgPool,
        actor: Role,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        Self::ensure_can_manage(actor, dto.role)?;

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (first_name, last_name, email, password, role, phone)
               VALUES ($1, $2, LOWER($3), $4, $5, $6)
               RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.email.trim())
        .bind(&hashed_password)
        .bind(dto.role)
        .bind(&dto.phone)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))?;

        track_user_created(user.role.as_str());
        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM users
               WHERE ($1::user_role IS NULL OR role = $1)
                 AND ($2::bool IS NULL OR is_active = $2)
                 AND ($3::text IS NULL
                      OR first_name ILIKE $3
                      OR last_name ILIKE $3
                      OR email ILIKE $3)"#,
        )
        .bind(filters.role)
        .bind(filters.is_active)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {} FROM users
               WHERE ($1::user_role IS NULL OR role = $1)
                 AND ($2::bool IS NULL OR is_active = $2)
                 AND ($3::text IS NULL
                      OR first_name ILIKE $3
                      OR last_name ILIKE $3
                      OR email ILIKE $3)
               ORDER BY created_at DESC
               LIMIT $4 OFFSET $5"#,
            USER_COLUMNS
        ))
        .bind(filters.role)
        .bind(filters.is_active)
        .bind(&search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &PgPool,
        actor: Role,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;
        Self::ensure_can_manage(actor, existing.role)?;
        if let Some(role) = dto.role {
            Self::ensure_can_manage(actor, role)?;
        }

        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET first_name = $1, last_name = $2, email = LOWER($3), role = $4, phone = $5,
                   is_active = $6, password = COALESCE($7, password), updated_at = NOW()
               WHERE id = $8
               RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(dto.first_name.unwrap_or(existing.first_name))
        .bind(dto.last_name.unwrap_or(existing.last_name))
        .bind(dto.email.map(|e| e.trim().to_string()).unwrap_or(existing.email))
        .bind(dto.role.unwrap_or(existing.role))
        .bind(dto.phone.or(existing.phone))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(password_hash)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn delete_user(
        db: &PgPool,
        actor_id: Uuid,
        actor: Role,
        id: Uuid,
    ) -> Result<(), AppError> {
        if actor_id == id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "You cannot delete your own account"
            )));
        }

        let existing = Self::get_user(db, id).await?;
        Self::ensure_can_manage(actor, existing.role)?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_super_admin_manages_super_admins() {
        assert!(UserService::ensure_can_manage(Role::SuperAdmin, Role::SuperAdmin).is_ok());
        assert!(UserService::ensure_can_manage(Role::Admin, Role::Principal).is_ok());

        let err = UserService::ensure_can_manage(Role::Admin, Role::SuperAdmin).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }
}
