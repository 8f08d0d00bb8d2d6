//! RBAC views served by `/api/permissions` and embedded in auth responses.

use chrono::{DateTime, Utc};
use edudesk_core::permissions::{access_levels, get_accessible_modules};
use edudesk_core::{AccessLevel, Module, Role};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A module the caller can reach and the levels held on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModuleAccess {
    pub module: Module,
    pub name: String,
    pub levels: Vec<AccessLevel>,
}

impl ModuleAccess {
    /// Every module `role` can reach, in catalogue order.
    pub fn for_role(role: Role) -> Vec<ModuleAccess> {
        get_accessible_modules(role)
            .into_iter()
            .map(|module| ModuleAccess {
                module,
                name: module.name().to_string(),
                levels: access_levels(role, module).to_vec(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleInfo {
    pub role: Role,
    pub name: String,
    pub level: u8,
}

impl From<Role> for RoleInfo {
    fn from(role: Role) -> Self {
        Self {
            role,
            name: role.display_name().to_string(),
            level: role.level(),
        }
    }
}

/// Row of the `modules` table.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ModuleRecord {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RolePermissions {
    pub role: Role,
    pub name: String,
    pub modules: Vec<ModuleAccess>,
}

impl RolePermissions {
    pub fn matrix() -> Vec<RolePermissions> {
        Role::ALL
            .into_iter()
            .map(|role| RolePermissions {
                role,
                name: role.display_name().to_string(),
                modules: ModuleAccess::for_role(role),
            })
            .collect()
    }
}

/// Raw strings so unknown values answer `false` instead of failing to parse.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PermissionCheckParams {
    pub role: Option<String>,
    pub module: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionCheckResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyPermissionsResponse {
    pub role: Role,
    pub modules: Vec<ModuleAccess>,
}
