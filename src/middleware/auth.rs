use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use edudesk_auth::{Claims, verify_token};
use edudesk_core::permissions::has_permission;
use edudesk_core::{AccessLevel, AppError, Module, Role};
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.0.user_id()
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn can(&self, module: Module, level: AccessLevel) -> bool {
        has_permission(self.0.role, module, level)
    }

    /// Returns 403 unless the role grants `level` on `module`.
    pub fn require(&self, module: Module, level: AccessLevel) -> Result<(), AppError> {
        if self.can(module, level) {
            return Ok(());
        }
        Err(AppError::forbidden(format!(
            "Access denied. Missing {} access to {}",
            level, module
        )))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that authenticates the caller and then checks one
/// (module, level) pair from the permission table.
#[macro_export]
macro_rules! require_access {
    ($name:ident, $module:ident, $level:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = edudesk_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                auth_user.require(
                    edudesk_core::Module::$module,
                    edudesk_core::AccessLevel::$level,
                )?;

                Ok($name(auth_user))
            }
        }
    };
}

require_access!(RequireDashboardRead, Dashboard, Read);

require_access!(RequireStudentsRead, Students, Read);
require_access!(RequireStudentsWrite, Students, Write);
require_access!(RequireStudentsAdmin, Students, Admin);

require_access!(RequireTeachersRead, Teachers, Read);
require_access!(RequireTeachersWrite, Teachers, Write);
require_access!(RequireTeachersAdmin, Teachers, Admin);

require_access!(RequireAttendanceRead, Attendance, Read);
require_access!(RequireAttendanceWrite, Attendance, Write);
require_access!(RequireAttendanceAdmin, Attendance, Admin);

require_access!(RequireFeesRead, Fees, Read);
require_access!(RequireFeesWrite, Fees, Write);
require_access!(RequireFeesAdmin, Fees, Admin);

require_access!(RequireSubjectsRead, Subjects, Read);
require_access!(RequireSubjectsWrite, Subjects, Write);
require_access!(RequireSubjectsAdmin, Subjects, Admin);

require_access!(RequireTimetableRead, Timetable, Read);
require_access!(RequireTimetableWrite, Timetable, Write);
require_access!(RequireTimetableAdmin, Timetable, Admin);

require_access!(RequireResultsRead, Results, Read);
require_access!(RequireResultsWrite, Results, Write);
require_access!(RequireResultsAdmin, Results, Admin);

require_access!(RequireDocumentsRead, Documents, Read);
require_access!(RequireDocumentsWrite, Documents, Write);
require_access!(RequireDocumentsAdmin, Documents, Admin);

require_access!(RequireNoticesRead, Notices, Read);
require_access!(RequireNoticesWrite, Notices, Write);
require_access!(RequireNoticesAdmin, Notices, Admin);

require_access!(RequireAssignmentsRead, Assignments, Read);
require_access!(RequireAssignmentsWrite, Assignments, Write);
require_access!(RequireAssignmentsAdmin, Assignments, Admin);

require_access!(RequireSubmissionsRead, Submissions, Read);
require_access!(RequireSubmissionsWrite, Submissions, Write);
require_access!(RequireSubmissionsAdmin, Submissions, Admin);

require_access!(RequireCalendarRead, Calendar, Read);
require_access!(RequireCalendarWrite, Calendar, Write);
require_access!(RequireCalendarAdmin, Calendar, Admin);

require_access!(RequireAdmissionsRead, Admissions, Read);
require_access!(RequireAdmissionsWrite, Admissions, Write);
require_access!(RequireAdmissionsAdmin, Admissions, Admin);

require_access!(RequireUsersRead, Users, Read);
require_access!(RequireUsersWrite, Users, Write);
require_access!(RequireUsersAdmin, Users, Admin);

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@school.test".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_can_follows_permission_table() {
        let accountant = auth_user(Role::Accountant);
        assert!(accountant.can(Module::Fees, AccessLevel::Admin));
        assert!(!accountant.can(Module::Attendance, AccessLevel::Read));

        let parent = auth_user(Role::Parent);
        assert!(parent.can(Module::Results, AccessLevel::Read));
        assert!(!parent.can(Module::Results, AccessLevel::Write));
    }

    #[test]
    fn test_require_reports_missing_level() {
        let err = auth_user(Role::Student)
            .require(Module::Students, AccessLevel::Write)
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert_eq!(
            err.error.to_string(),
            "Access denied. Missing write access to students"
        );
    }

    #[test]
    fn test_user_id_from_claims() {
        let user_id = Uuid::new_v4();
        let mut user = auth_user(Role::Admin);
        user.0.sub = user_id.to_string();
        assert_eq!(user.user_id().unwrap(), user_id);
        assert_eq!(user.role(), Role::Admin);
    }
}
