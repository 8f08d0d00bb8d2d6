//! Weekly class timetable.

use chrono::{DateTime, NaiveTime, Utc};
use edudesk_core::serde::{deserialize_optional_i32, deserialize_optional_uuid};
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const TIMETABLE_COLUMNS: &str = "id, class_name, section, day_of_week, period, subject_id, \
    teacher_id, start_time, end_time, room, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimetableEntry {
    pub id: Uuid,
    pub class_name: String,
    pub section: Option<String>,
    /// 1 = Monday … 7 = Sunday
    pub day_of_week: i16,
    pub period: i16,
    pub subject_id: Uuid,
    pub teacher_id: Option<Uuid>,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "08:40:00")]
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_times"))]
pub struct CreateTimetableEntryDto {
    #[validate(length(min = 1, max = 50))]
    pub class_name: String,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: i16,
    #[validate(range(min = 1))]
    pub period: i16,
    pub subject_id: Uuid,
    pub teacher_id: Option<Uuid>,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "08:40:00")]
    pub end_time: NaiveTime,
    #[validate(length(max = 50))]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTimetableEntryDto {
    #[validate(length(min = 1, max = 50))]
    pub class_name: Option<String>,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: Option<i16>,
    #[validate(range(min = 1))]
    pub period: Option<i16>,
    pub subject_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 50))]
    pub room: Option<String>,
}

pub fn check_time_order(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if end <= start {
        let mut err = ValidationError::new("time_order");
        err.message = Some("end_time must be after start_time".into());
        return Err(err);
    }
    Ok(())
}

fn validate_create_times(dto: &CreateTimetableEntryDto) -> Result<(), ValidationError> {
    check_time_order(dto.start_time, dto.end_time)
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimetableFilterParams {
    pub class_name: Option<String>,
    pub section: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub day_of_week: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub subject_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTimetableResponse {
    pub data: Vec<TimetableEntry>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dto(day: i16, start: NaiveTime, end: NaiveTime) -> CreateTimetableEntryDto {
        CreateTimetableEntryDto {
            class_name: "JSS1".to_string(),
            section: Some("A".to_string()),
            day_of_week: day,
            period: 1,
            subject_id: Uuid::nil(),
            teacher_id: None,
            start_time: start,
            end_time: end,
            room: None,
        }
    }

    #[test]
    fn test_valid_slot() {
        assert!(dto(1, time(8, 0), time(8, 40)).validate().is_ok());
        assert!(dto(7, time(8, 0), time(8, 40)).validate().is_ok());
    }

    #[test]
    fn test_day_out_of_range() {
        assert!(dto(0, time(8, 0), time(8, 40)).validate().is_err());
        assert!(dto(8, time(8, 0), time(8, 40)).validate().is_err());
    }

    #[test]
    fn test_end_must_follow_start() {
        assert!(dto(2, time(9, 0), time(9, 0)).validate().is_err());
        assert!(dto(2, time(9, 0), time(8, 0)).validate().is_err());
    }
}
