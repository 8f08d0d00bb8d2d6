//! Subjects offered per class.

use chrono::{DateTime, Utc};
use edudesk_core::serde::deserialize_optional_uuid;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const SUBJECT_COLUMNS: &str =
    "id, name, code, class_name, teacher_id, description, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub class_name: String,
    pub teacher_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 30))]
    #[schema(example = "MTH-JSS1")]
    pub code: String,
    #[validate(length(min = 1, max = 50))]
    pub class_name: String,
    pub teacher_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub class_name: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectFilterParams {
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    /// Matches name or code
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSubjectsResponse {
    pub data: Vec<Subject>,
    pub meta: PaginationMeta,
}
