//! Daily attendance.

use chrono::{DateTime, NaiveDate, Utc};
use edudesk_core::serde::{deserialize_optional_date, deserialize_optional_uuid};
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

pub const ATTENDANCE_COLUMNS: &str =
    "id, student_id, date, status, remarks, marked_by, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    /// User who recorded the entry
    pub marked_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAttendanceDto {
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAttendanceDto {
    pub status: Option<AttendanceStatus>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkAttendanceEntry {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

/// Marks a whole register for one date; existing entries are overwritten.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkAttendanceDto {
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 500), nested)]
    pub records: Vec<BulkAttendanceEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkAttendanceResponse {
    pub date: NaiveDate,
    /// Number of student/date rows written
    pub marked: usize,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    /// Inclusive lower bound
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceSummaryParams {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub student_id: Uuid,
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    /// (present + late) / total × 100, rounded to two decimals
    pub percentage: f64,
}

impl AttendanceSummary {
    pub fn from_counts(
        student_id: Uuid,
        present: i64,
        absent: i64,
        late: i64,
        excused: i64,
    ) -> Self {
        let total = present + absent + late + excused;
        Self {
            student_id,
            total,
            present,
            absent,
            late,
            excused,
            percentage: attendance_percentage(present + late, total),
        }
    }
}

/// Share of attended days; zero when nothing was recorded.
pub fn attendance_percentage(attended: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = attended as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAttendanceResponse {
    pub data: Vec<Attendance>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_counts_late_as_attended() {
        let summary = AttendanceSummary::from_counts(Uuid::nil(), 6, 2, 1, 1);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.percentage, 70.0);
    }

    #[test]
    fn test_bulk_register_validates_each_entry() {
        let entry = BulkAttendanceEntry {
            student_id: Uuid::nil(),
            status: AttendanceStatus::Present,
            remarks: None,
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();

        let ok = BulkAttendanceDto {
            date,
            records: vec![entry.clone()],
        };
        assert!(ok.validate().is_ok());

        let empty = BulkAttendanceDto {
            date,
            records: vec![],
        };
        assert!(empty.validate().is_err());

        let long_remark = BulkAttendanceDto {
            date,
            records: vec![BulkAttendanceEntry {
                remarks: Some("x".repeat(501)),
                ..entry
            }],
        };
        assert!(long_remark.validate().is_err());
    }

    #[test]
    fn test_percentage_is_zero_without_records() {
        let summary = AttendanceSummary::from_counts(Uuid::nil(), 0, 0, 0, 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn test_percentage_rounds_to_two_places() {
        assert_eq!(attendance_percentage(2, 3), 66.67);
        assert_eq!(attendance_percentage(1, 3), 33.33);
        assert_eq!(attendance_percentage(3, 3), 100.0);
    }

    #[test]
    fn test_bulk_requires_records() {
        let dto = BulkAttendanceDto {
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            records: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let status: AttendanceStatus = serde_json::from_str("\"excused\"").unwrap();
        assert_eq!(status, AttendanceStatus::Excused);
        assert!(serde_json::from_str::<AttendanceStatus>("\"sick\"").is_err());
    }
}
