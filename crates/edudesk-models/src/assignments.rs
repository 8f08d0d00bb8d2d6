//! Homework and assignments.

use chrono::{DateTime, Utc};
use edudesk_core::serde::deserialize_optional_uuid;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_MAX_MARKS: f64 = 100.0;

pub const ASSIGNMENT_COLUMNS: &str = "id, title, description, subject_id, teacher_id, class_name, \
    section, due_date, max_marks, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subject_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub class_name: String,
    pub section: Option<String>,
    pub due_date: DateTime<Utc>,
    pub max_marks: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub subject_id: Uuid,
    pub teacher_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub class_name: String,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    pub due_date: DateTime<Utc>,
    /// Defaults to 100
    #[validate(range(exclusive_min = 0.0))]
    pub max_marks: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub class_name: Option<String>,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(range(exclusive_min = 0.0))]
    pub max_marks: Option<f64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignmentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub subject_id: Option<Uuid>,
    pub class_name: Option<String>,
    pub section: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAssignmentsResponse {
    pub data: Vec<Assignment>,
    pub meta: PaginationMeta,
}
