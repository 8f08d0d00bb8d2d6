//! Role-aware dashboard payload. Blocks the caller cannot read are omitted.

use chrono::NaiveDate;
use edudesk_core::Role;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::calendar::CalendarEvent;
use crate::fees::FeeSummary;
use crate::notices::Notice;
use crate::permissions::ModuleAccess;

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
pub struct HeadcountStats {
    pub total: i64,
    pub active: i64,
}

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
pub struct AttendanceTodayStats {
    #[sqlx(skip)]
    pub date: Option<NaiveDate>,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
pub struct AdmissionStats {
    pub pending: i64,
    pub waitlisted: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub role: Role,
    pub modules: Vec<ModuleAccess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<HeadcountStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teachers: Option<HeadcountStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_today: Option<AttendanceTodayStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<FeeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admissions: Option<AdmissionStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_events: Option<Vec<CalendarEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_notices: Option<Vec<Notice>>,
}

impl DashboardResponse {
    pub fn empty(role: Role) -> Self {
        Self {
            role,
            modules: ModuleAccess::for_role(role),
            students: None,
            teachers: None,
            attendance_today: None,
            fees: None,
            admissions: None,
            upcoming_events: None,
            recent_notices: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_blocks_are_not_serialized() {
        let json = serde_json::to_value(DashboardResponse::empty(Role::Parent)).unwrap();
        assert_eq!(json["role"], "parent");
        assert!(json.get("teachers").is_none());
        assert!(json.get("fees").is_none());
        assert!(json["modules"].as_array().is_some_and(|m| !m.is_empty()));
    }
}
