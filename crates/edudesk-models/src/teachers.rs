//! Teaching staff records.

use chrono::{DateTime, NaiveDate, Utc};
use edudesk_core::serde::deserialize_optional_bool;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const TEACHER_COLUMNS: &str = "id, user_id, employee_id, first_name, last_name, email, \
    phone, qualification, specialization, joining_date, is_class_teacher, class_name, section, \
    is_active, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_class_teacher: bool,
    /// Class the teacher is responsible for, when a class teacher
    pub class_name: Option<String>,
    pub section: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub employee_id: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub qualification: Option<String>,
    #[validate(length(max = 200))]
    pub specialization: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_class_teacher: Option<bool>,
    #[validate(length(max = 50))]
    pub class_name: Option<String>,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub employee_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub qualification: Option<String>,
    #[validate(length(max = 200))]
    pub specialization: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub is_class_teacher: Option<bool>,
    #[validate(length(max = 50))]
    pub class_name: Option<String>,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherFilterParams {
    pub specialization: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    /// Matches name, email or employee id
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<Teacher>,
    pub meta: PaginationMeta,
}
