//! Student records.

use chrono::{DateTime, NaiveDate, Utc};
use edudesk_core::serde::deserialize_optional_bool;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const STUDENT_COLUMNS: &str = "id, user_id, parent_user_id, admission_number, first_name, \
    last_name, date_of_birth, gender, class_name, section, roll_number, guardian_name, \
    guardian_phone, address, is_active, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    /// Login account of the student, if any
    pub user_id: Option<Uuid>,
    /// Login account of the parent, if any
    pub parent_user_id: Option<Uuid>,
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub class_name: String,
    pub section: Option<String>,
    pub roll_number: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    pub user_id: Option<Uuid>,
    pub parent_user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub admission_number: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub class_name: String,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    #[validate(length(max = 20))]
    pub roll_number: Option<String>,
    #[validate(length(max = 200))]
    pub guardian_name: Option<String>,
    #[validate(length(max = 30))]
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    pub user_id: Option<Uuid>,
    pub parent_user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub admission_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub class_name: Option<String>,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    #[validate(length(max = 20))]
    pub roll_number: Option<String>,
    #[validate(length(max = 200))]
    pub guardian_name: Option<String>,
    #[validate(length(max = 30))]
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    pub class_name: Option<String>,
    pub section: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    /// Matches name or admission number
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}
