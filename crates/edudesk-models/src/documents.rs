//! Document metadata; file bytes live in the storage backend.

use chrono::{DateTime, Utc};
use edudesk_core::serde::deserialize_optional_uuid;
use edudesk_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DOCUMENT_COLUMNS: &str = "id, title, document_type, description, file_path, file_url, \
    mime_type, file_size, student_id, teacher_id, uploaded_by, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    #[schema(example = "certificate")]
    pub document_type: String,
    pub description: Option<String>,
    /// Storage key when the file was uploaded through the API
    pub file_path: Option<String>,
    pub file_url: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registers a document hosted elsewhere (no upload).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub document_type: String,
    pub description: Option<String>,
    #[validate(url)]
    pub file_url: Option<String>,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub document_type: Option<String>,
    pub description: Option<String>,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

/// Multipart body of `POST /api/documents/upload` (OpenAPI only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadDocumentForm {
    /// File content
    pub file: String,
    pub title: String,
    pub document_type: String,
    pub description: Option<String>,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

/// Text fields collected from an upload form before validation.
#[derive(Debug, Clone, Default, Validate)]
pub struct UploadDocumentFields {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub document_type: String,
    pub description: Option<String>,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentFilterParams {
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    /// Matches title
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedDocumentsResponse {
    pub data: Vec<Document>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_url_must_be_valid() {
        let dto = CreateDocumentDto {
            title: "Birth certificate".to_string(),
            document_type: "certificate".to_string(),
            description: None,
            file_url: Some("not a url".to_string()),
            student_id: None,
            teacher_id: None,
        };
        assert!(dto.validate().is_err());
        let dto = CreateDocumentDto {
            file_url: Some("https://files.school.test/cert.pdf".to_string()),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_upload_fields_need_title() {
        let fields = UploadDocumentFields {
            document_type: "report".to_string(),
            ..Default::default()
        };
        assert!(fields.validate().is_err());
    }
}
