use edudesk_core::permissions::has_permission_str;
use edudesk_core::{AppError, Role};
use edudesk_models::permissions::{ModuleRecord, PermissionCheckParams, RoleInfo};
use sqlx::PgPool;
use tracing::instrument;

pub struct PermissionService;

impl PermissionService {
    pub fn roles() -> Vec<RoleInfo> {
        Role::ALL.into_iter().map(RoleInfo::from).collect()
    }

    #[instrument(skip(db))]
    pub async fn list_modules(db: &PgPool) -> Result<Vec<ModuleRecord>, AppError> {
        let modules = sqlx::query_as::<_, ModuleRecord>(
            r#"SELECT id, key, name, description, sort_order, created_at, updated_at
               FROM modules
               ORDER BY sort_order, key"#,
        )
        .fetch_all(db)
        .await?;

        Ok(modules)
    }

    /// Missing or unknown inputs answer `false`. A missing level means "read".
    pub fn check(params: &PermissionCheckParams) -> bool {
        match (params.role.as_deref(), params.module.as_deref()) {
            (Some(role), Some(module)) => {
                has_permission_str(role, module, params.level.as_deref().unwrap_or("read"))
            }
            _ => false,
        }
    }
}
