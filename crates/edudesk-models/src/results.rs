//! Examination results, grading and report cards.

use chrono::{DateTime, Utc};
use edudesk_core::serde::deserialize_optional_uuid;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Lower percentage bound of each grade, best first.
pub const GRADE_SCALE: [(f64, &str); 6] = [
    (90.0, "A+"),
    (80.0, "A"),
    (70.0, "B"),
    (60.0, "C"),
    (50.0, "D"),
    (40.0, "E"),
];

pub const FAIL_GRADE: &str = "F";

fn raw_percentage(marks_obtained: f64, max_marks: f64) -> f64 {
    if max_marks <= 0.0 {
        return 0.0;
    }
    marks_obtained / max_marks * 100.0
}

/// Percentage rounded to two decimals, for display.
pub fn percentage(marks_obtained: f64, max_marks: f64) -> f64 {
    (raw_percentage(marks_obtained, max_marks) * 100.0).round() / 100.0
}

pub fn grade_for_percentage(pct: f64) -> &'static str {
    GRADE_SCALE
        .iter()
        .find(|(min, _)| pct >= *min)
        .map(|(_, grade)| *grade)
        .unwrap_or(FAIL_GRADE)
}

/// Bands are chosen from the unrounded ratio so 89.999% stays an A.
pub fn compute_grade(marks_obtained: f64, max_marks: f64) -> &'static str {
    grade_for_percentage(raw_percentage(marks_obtained, max_marks))
}

pub const RESULT_COLUMNS: &str = "id, student_id, subject_id, exam_type, term, academic_year, \
    marks_obtained, max_marks, grade, remarks, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamResult {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    #[schema(example = "final")]
    pub exam_type: String,
    #[schema(example = "first")]
    pub term: String,
    #[schema(example = "2024/2025")]
    pub academic_year: String,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub grade: String,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_marks"))]
pub struct CreateResultDto {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    #[validate(length(min = 1, max = 50))]
    pub exam_type: String,
    #[validate(length(min = 1, max = 50))]
    pub term: String,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: String,
    #[validate(range(min = 0.0))]
    pub marks_obtained: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub max_marks: f64,
    pub remarks: Option<String>,
}

pub fn check_marks(marks_obtained: f64, max_marks: f64) -> Result<(), ValidationError> {
    if marks_obtained > max_marks {
        let mut err = ValidationError::new("marks_exceed_max");
        err.message = Some("marks_obtained cannot exceed max_marks".into());
        return Err(err);
    }
    Ok(())
}

fn validate_marks(dto: &CreateResultDto) -> Result<(), ValidationError> {
    check_marks(dto.marks_obtained, dto.max_marks)
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateResultDto {
    #[validate(length(min = 1, max = 50))]
    pub exam_type: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub term: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: Option<String>,
    #[validate(range(min = 0.0))]
    pub marks_obtained: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub max_marks: Option<f64>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub subject_id: Option<Uuid>,
    pub exam_type: Option<String>,
    pub term: Option<String>,
    pub academic_year: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportCardParams {
    pub term: Option<String>,
    pub academic_year: Option<String>,
}

/// One result row joined with its subject.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReportCardEntry {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub subject_code: String,
    pub exam_type: String,
    pub term: String,
    pub academic_year: String,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub grade: String,
    #[sqlx(skip)]
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportCardStudent {
    pub id: Uuid,
    pub name: String,
    pub admission_number: String,
    pub class_name: String,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportCard {
    pub student: ReportCardStudent,
    pub term: Option<String>,
    pub academic_year: Option<String>,
    pub entries: Vec<ReportCardEntry>,
    pub total_obtained: f64,
    pub total_max: f64,
    pub percentage: f64,
    pub grade: String,
}

impl ReportCard {
    pub fn build(
        student: ReportCardStudent,
        term: Option<String>,
        academic_year: Option<String>,
        mut entries: Vec<ReportCardEntry>,
    ) -> Self {
        for entry in &mut entries {
            entry.percentage = percentage(entry.marks_obtained, entry.max_marks);
        }
        let total_obtained: f64 = entries.iter().map(|e| e.marks_obtained).sum();
        let total_max: f64 = entries.iter().map(|e| e.max_marks).sum();
        let overall = percentage(total_obtained, total_max);
        let grade = if entries.is_empty() {
            "-".to_string()
        } else {
            compute_grade(total_obtained, total_max).to_string()
        };

        Self {
            student,
            term,
            academic_year,
            entries,
            total_obtained,
            total_max,
            percentage: overall,
            grade,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResultsResponse {
    pub data: Vec<ExamResult>,
    pub meta: PaginationMeta,
}
