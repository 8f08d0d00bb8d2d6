//! Admission applications.

use chrono::{DateTime, NaiveDate, Utc};
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::students::Student;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "admission_status", rename_all = "snake_case")]
pub enum AdmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Waitlisted,
}

impl AdmissionStatus {
    /// Approval and rejection only happen from an open application.
    pub fn is_open(self) -> bool {
        matches!(self, AdmissionStatus::Pending | AdmissionStatus::Waitlisted)
    }
}

pub const ADMISSION_COLUMNS: &str = "id, applicant_first_name, applicant_last_name, \
    date_of_birth, gender, applying_for_class, guardian_name, guardian_phone, guardian_email, \
    address, previous_school, status, notes, reviewed_by, reviewed_at, student_id, created_at, \
    updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admission {
    pub id: Uuid,
    pub applicant_first_name: String,
    pub applicant_last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub applying_for_class: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: Option<String>,
    pub address: Option<String>,
    pub previous_school: Option<String>,
    pub status: AdmissionStatus,
    pub notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Student created on approval
    pub student_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdmissionDto {
    #[validate(length(min = 1, max = 100))]
    pub applicant_first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub applicant_last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub applying_for_class: String,
    #[validate(length(min = 1, max = 200))]
    pub guardian_name: String,
    #[validate(length(min = 1, max = 30))]
    pub guardian_phone: String,
    #[validate(email)]
    pub guardian_email: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 200))]
    pub previous_school: Option<String>,
    pub notes: Option<String>,
}

/// `status` may only move between `pending` and `waitlisted`; use the
/// approve/reject endpoints for final decisions.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAdmissionDto {
    #[validate(length(min = 1, max = 100))]
    pub applicant_first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub applicant_last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub applying_for_class: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub guardian_name: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub guardian_phone: Option<String>,
    #[validate(email)]
    pub guardian_email: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 200))]
    pub previous_school: Option<String>,
    pub status: Option<AdmissionStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ApproveAdmissionDto {
    #[validate(length(min = 1, max = 50))]
    pub admission_number: String,
    /// Defaults to the class applied for
    #[validate(length(min = 1, max = 50))]
    pub class_name: Option<String>,
    #[validate(length(max = 20))]
    pub section: Option<String>,
    #[validate(length(max = 20))]
    pub roll_number: Option<String>,
    pub parent_user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RejectAdmissionDto {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalResponse {
    pub admission: Admission,
    pub student: Student,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdmissionFilterParams {
    pub status: Option<AdmissionStatus>,
    pub applying_for_class: Option<String>,
    /// Matches applicant or guardian name
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAdmissionsResponse {
    pub data: Vec<Admission>,
    pub meta: PaginationMeta,
}
