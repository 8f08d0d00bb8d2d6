//! Assignment submissions and grading.

use chrono::{DateTime, Utc};
use edudesk_core::serde::deserialize_optional_uuid;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    Late,
    Graded,
    Returned,
}

impl SubmissionStatus {
    /// Status of a fresh submission made at `submitted_at`.
    pub fn on_submit(submitted_at: DateTime<Utc>, due_date: DateTime<Utc>) -> Self {
        if submitted_at > due_date {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        }
    }

    pub fn is_final(self) -> bool {
        matches!(self, SubmissionStatus::Graded | SubmissionStatus::Returned)
    }
}

pub const SUBMISSION_COLUMNS: &str = "id, assignment_id, student_id, content, file_url, \
    submitted_at, status, marks, feedback, graded_by, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub marks: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_has_body"))]
pub struct CreateSubmissionDto {
    pub assignment_id: Uuid,
    /// Required when staff submit on a student's behalf; ignored for students
    pub student_id: Option<Uuid>,
    pub content: Option<String>,
    #[validate(url)]
    pub file_url: Option<String>,
}

fn validate_has_body(dto: &CreateSubmissionDto) -> Result<(), ValidationError> {
    check_has_body(dto.content.as_deref(), dto.file_url.as_deref())
}

pub fn check_has_body(
    content: Option<&str>,
    file_url: Option<&str>,
) -> Result<(), ValidationError> {
    let has_content = content.is_some_and(|c| !c.trim().is_empty());
    if !has_content && file_url.is_none() {
        let mut err = ValidationError::new("empty_submission");
        err.message = Some("Either content or file_url is required".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubmissionDto {
    pub content: Option<String>,
    #[validate(url)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionDto {
    #[validate(range(min = 0.0))]
    pub marks: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubmissionFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub assignment_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    pub status: Option<SubmissionStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSubmissionsResponse {
    pub data: Vec<Submission>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_late_only_after_due_date() {
        let due = Utc::now();
        assert_eq!(
            SubmissionStatus::on_submit(due - Duration::minutes(5), due),
            SubmissionStatus::Submitted
        );
        assert_eq!(SubmissionStatus::on_submit(due, due), SubmissionStatus::Submitted);
        assert_eq!(
            SubmissionStatus::on_submit(due + Duration::seconds(1), due),
            SubmissionStatus::Late
        );
    }

    #[test]
    fn test_submission_needs_content_or_file() {
        let dto = CreateSubmissionDto {
            assignment_id: Uuid::nil(),
            student_id: None,
            content: Some("   ".to_string()),
            file_url: None,
        };
        assert!(dto.validate().is_err());

        let with_text = CreateSubmissionDto {
            content: Some("My essay".to_string()),
            ..dto.clone()
        };
        assert!(with_text.validate().is_ok());

        let with_file = CreateSubmissionDto {
            file_url: Some("https://files.school.test/essay.pdf".to_string()),
            ..dto
        };
        assert!(with_file.validate().is_ok());
    }

    #[test]
    fn test_final_statuses() {
        assert!(SubmissionStatus::Graded.is_final());
        assert!(!SubmissionStatus::Late.is_final());
    }
}
