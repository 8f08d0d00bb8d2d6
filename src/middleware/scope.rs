//! Row scoping for student-linked data.
//!
//! Staff roles see every student. A `student` sees the record linked to their
//! account through `students.user_id`; a `parent` sees the records whose
//! `parent_user_id` points at them.

use edudesk_core::{AppError, Role};
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentScope {
    All,
    Only(Vec<Uuid>),
}

impl StudentScope {
    pub async fn for_user(db: &PgPool, auth_user: &AuthUser) -> Result<Self, AppError> {
        let column = match auth_user.role() {
            Role::Student => "user_id",
            Role::Parent => "parent_user_id",
            _ => return Ok(StudentScope::All),
        };

        let user_id = auth_user.user_id()?;
        let ids = sqlx::query_scalar::<_, Uuid>(&format!(
            "SELECT id FROM students WHERE {} = $1 ORDER BY created_at",
            column
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(StudentScope::Only(ids))
    }

    /// Bind value for `($n::uuid[] IS NULL OR student_id = ANY($n))`.
    pub fn ids(&self) -> Option<Vec<Uuid>> {
        match self {
            StudentScope::All => None,
            StudentScope::Only(ids) => Some(ids.clone()),
        }
    }

    pub fn allows(&self, student_id: Uuid) -> bool {
        match self {
            StudentScope::All => true,
            StudentScope::Only(ids) => ids.contains(&student_id),
        }
    }

    pub fn ensure(&self, student_id: Uuid) -> Result<(), AppError> {
        if self.allows(student_id) {
            return Ok(());
        }
        Err(AppError::forbidden(
            "Access denied. Record belongs to another student".to_string(),
        ))
    }
}

/// Resolves the student record linked to the caller's own account.
pub async fn own_student_id(db: &PgPool, auth_user: &AuthUser) -> Result<Uuid, AppError> {
    let user_id = auth_user.user_id()?;
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM students WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::forbidden("No student record is linked to this account".to_string())
        })
}
