//! School notices.
//!
//! A notice targets the roles listed in `audience`; an empty audience means
//! everyone. Readers without admin access on notices only see notices that
//! are active, already published, not expired, and addressed to their role.

use chrono::{DateTime, Utc};
use edudesk_core::serde::deserialize_optional_bool;
use edudesk_core::{PaginationMeta, PaginationParams, Role};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notice_priority", rename_all = "snake_case")]
pub enum NoticePriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

pub const NOTICE_COLUMNS: &str = "id, title, content, audience, priority, published_by, \
    publish_date, expires_at, is_active, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Target roles; empty means everyone
    pub audience: Vec<Role>,
    pub priority: NoticePriority,
    pub published_by: Option<Uuid>,
    pub publish_date: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notice {
    pub fn is_addressed_to(&self, role: Role) -> bool {
        self.audience.is_empty() || self.audience.contains(&role)
    }

    /// Whether a non-admin reader with `role` may see this notice at `now`.
    pub fn is_visible_to(&self, role: Role, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.publish_date <= now
            && self.expires_at.is_none_or(|exp| exp > now)
            && self.is_addressed_to(role)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNoticeDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub audience: Vec<Role>,
    pub priority: Option<NoticePriority>,
    /// Defaults to now
    pub publish_date: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateNoticeDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub audience: Option<Vec<Role>>,
    pub priority: Option<NoticePriority>,
    pub publish_date: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoticeFilterParams {
    pub priority: Option<NoticePriority>,
    /// Honoured for notice admins only
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    /// Matches title or content
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedNoticesResponse {
    pub data: Vec<Notice>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn notice(audience: Vec<Role>) -> Notice {
        let now = Utc::now();
        Notice {
            id: Uuid::nil(),
            title: "Mid-term break".to_string(),
            content: "School closes on Friday".to_string(),
            audience,
            priority: NoticePriority::Normal,
            published_by: None,
            publish_date: now - Duration::hours(1),
            expires_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_audience_reaches_everyone() {
        let n = notice(vec![]);
        for role in Role::ALL {
            assert!(n.is_visible_to(role, Utc::now()));
        }
    }

    #[test]
    fn test_audience_restricts_roles() {
        let n = notice(vec![Role::Parent, Role::ClassTeacher]);
        assert!(n.is_visible_to(Role::Parent, Utc::now()));
        assert!(!n.is_visible_to(Role::Student, Utc::now()));
    }

    #[test]
    fn test_expired_inactive_and_future_notices_are_hidden() {
        let now = Utc::now();

        let mut expired = notice(vec![]);
        expired.expires_at = Some(now - Duration::minutes(1));
        assert!(!expired.is_visible_to(Role::Student, now));

        let mut inactive = notice(vec![]);
        inactive.is_active = false;
        assert!(!inactive.is_visible_to(Role::Student, now));

        let mut scheduled = notice(vec![]);
        scheduled.publish_date = now + Duration::days(1);
        assert!(!scheduled.is_visible_to(Role::Student, now));
    }

    #[test]
    fn test_default_priority_is_normal() {
        assert_eq!(NoticePriority::default(), NoticePriority::Normal);
    }
}
