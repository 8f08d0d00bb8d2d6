//! Academic calendar events.

use chrono::{DateTime, NaiveDate, Utc};
use edudesk_core::serde::deserialize_optional_date;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "event_type", rename_all = "snake_case")]
pub enum EventType {
    Holiday,
    Exam,
    Meeting,
    #[default]
    Event,
    Other,
}

pub const CALENDAR_EVENT_COLUMNS: &str = "id, title, description, event_type, start_date, \
    end_date, all_day, location, created_by, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub all_day: bool,
    pub location: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateCalendarEventDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub all_day: Option<bool>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

pub fn check_date_order(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        let mut err = ValidationError::new("date_order");
        err.message = Some("end_date cannot be before start_date".into());
        return Err(err);
    }
    Ok(())
}

fn validate_create_dates(dto: &CreateCalendarEventDto) -> Result<(), ValidationError> {
    check_date_order(dto.start_date, dto.end_date)
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCalendarEventDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

/// `from`/`to` select events overlapping the inclusive date window.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarEventFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to: Option<NaiveDate>,
    pub event_type: Option<EventType>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCalendarEventsResponse {
    pub data: Vec<CalendarEvent>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_single_instant_event_is_valid() {
        let now = Utc::now();
        assert!(check_date_order(now, now).is_ok());
        assert!(check_date_order(now, now - Duration::hours(1)).is_err());
    }

    #[test]
    fn test_create_rejects_reversed_dates() {
        let now = Utc::now();
        let dto = CreateCalendarEventDto {
            title: "Sports day".to_string(),
            description: None,
            event_type: Some(EventType::Event),
            start_date: now,
            end_date: now - Duration::days(1),
            all_day: Some(true),
            location: None,
        };
        assert!(dto.validate().is_err());
    }
}
