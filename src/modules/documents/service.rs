use axum::http::StatusCode;
use edudesk_core::errors::is_foreign_key_violation;
use edudesk_core::file_storage::extension_for;
use edudesk_core::search::search_pattern;
use edudesk_core::{AppError, FileStorage, PaginationMeta, StorageError};
use edudesk_models::documents::{
    CreateDocumentDto, DOCUMENT_COLUMNS, Document, DocumentFilterParams, PaginatedDocumentsResponse,
    UpdateDocumentDto, UploadDocumentFields,
};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::scope::StudentScope;

/// File part of an upload form.
#[derive(Debug)]
pub struct UploadedFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn document_write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow::anyhow!("Student or teacher not found"));
    }
    AppError::from(err)
}

fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::InvalidFileSize { .. } => AppError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            anyhow::anyhow!(err.to_string()),
        ),
        StorageError::InvalidMimeType { .. } => {
            AppError::bad_request(anyhow::anyhow!(err.to_string()))
        }
        StorageError::InvalidKey(_) | StorageError::IoError(_) => AppError::internal(err),
    }
}

pub struct DocumentService;

impl DocumentService {
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_document(
        db: &PgPool,
        uploaded_by: Uuid,
        dto: CreateDocumentDto,
    ) -> Result<Document, AppError> {
        let document = sqlx::query_as::<_, Document>(&format!(
            r#"INSERT INTO documents
                   (title, document_type, description, file_url, student_id, teacher_id, uploaded_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {}"#,
            DOCUMENT_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.document_type)
        .bind(&dto.description)
        .bind(&dto.file_url)
        .bind(dto.student_id)
        .bind(dto.teacher_id)
        .bind(uploaded_by)
        .fetch_one(db)
        .await
        .map_err(document_write_error)?;

        Ok(document)
    }

    /// Stores the file, then records its metadata. The stored file is removed
    /// again if the insert fails.
    #[instrument(
        skip(db, storage, fields, file),
        fields(title = %fields.title, size = file.bytes.len())
    )]
    pub async fn upload_document(
        db: &PgPool,
        storage: &dyn FileStorage,
        uploaded_by: Uuid,
        fields: UploadDocumentFields,
        file: UploadedFile,
    ) -> Result<Document, AppError> {
        let extension = extension_for(&file.content_type).map_err(storage_error)?;
        let key = format!("documents/{}.{}", Uuid::new_v4(), extension);

        let key = storage
            .save(&key, &file.bytes)
            .await
            .map_err(storage_error)?;
        let url = storage.get_url(&key).map_err(storage_error)?;

        let inserted = sqlx::query_as::<_, Document>(&format!(
            r#"INSERT INTO documents
                   (title, document_type, description, file_path, file_url, mime_type,
                    file_size, student_id, teacher_id, uploaded_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING {}"#,
            DOCUMENT_COLUMNS
        ))
        .bind(&fields.title)
        .bind(&fields.document_type)
        .bind(&fields.description)
        .bind(&key)
        .bind(&url)
        .bind(file.content_type.to_ascii_lowercase())
        .bind(file.bytes.len() as i64)
        .bind(fields.student_id)
        .bind(fields.teacher_id)
        .bind(uploaded_by)
        .fetch_one(db)
        .await;

        match inserted {
            Ok(document) => {
                tracing::info!(document_id = %document.id, key = %key, "Document uploaded");
                Ok(document)
            }
            Err(e) => {
                if let Err(cleanup) = storage.delete(&key).await {
                    tracing::warn!(
                        key = %key,
                        error = %cleanup,
                        "Failed to remove orphaned upload"
                    );
                }
                Err(document_write_error(e))
            }
        }
    }

    /// Students and parents see general documents plus those tied to their
    /// own records.
    #[instrument(skip(db, scope))]
    pub async fn get_documents(
        db: &PgPool,
        scope: &StudentScope,
        filters: DocumentFilterParams,
    ) -> Result<PaginatedDocumentsResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());
        let allowed = scope.ids();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM documents
               WHERE ($1::text IS NULL OR document_type = $1)
                 AND ($2::uuid IS NULL OR student_id = $2)
                 AND ($3::uuid IS NULL OR teacher_id = $3)
                 AND ($4::text IS NULL OR title ILIKE $4)
                 AND ($5::uuid[] IS NULL OR student_id IS NULL OR student_id = ANY($5))"#,
        )
        .bind(&filters.document_type)
        .bind(filters.student_id)
        .bind(filters.teacher_id)
        .bind(&search)
        .bind(&allowed)
        .fetch_one(db)
        .await?;

        let documents = sqlx::query_as::<_, Document>(&format!(
            r#"SELECT {} FROM documents
               WHERE ($1::text IS NULL OR document_type = $1)
                 AND ($2::uuid IS NULL OR student_id = $2)
                 AND ($3::uuid IS NULL OR teacher_id = $3)
                 AND ($4::text IS NULL OR title ILIKE $4)
                 AND ($5::uuid[] IS NULL OR student_id IS NULL OR student_id = ANY($5))
               ORDER BY created_at DESC
               LIMIT $6 OFFSET $7"#,
            DOCUMENT_COLUMNS
        ))
        .bind(&filters.document_type)
        .bind(filters.student_id)
        .bind(filters.teacher_id)
        .bind(&search)
        .bind(&allowed)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedDocumentsResponse {
            data: documents,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_document(db: &PgPool, id: Uuid) -> Result<Document, AppError> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Document not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_document(
        db: &PgPool,
        id: Uuid,
        dto: UpdateDocumentDto,
    ) -> Result<Document, AppError> {
        let existing = Self::get_document(db, id).await?;

        let document = sqlx::query_as::<_, Document>(&format!(
            r#"UPDATE documents
               SET title = $1, document_type = $2, description = $3,
                   student_id = $4, teacher_id = $5, updated_at = NOW()
               WHERE id = $6
               RETURNING {}"#,
            DOCUMENT_COLUMNS
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.document_type.unwrap_or(existing.document_type))
        .bind(dto.description.or(existing.description))
        .bind(dto.student_id.or(existing.student_id))
        .bind(dto.teacher_id.or(existing.teacher_id))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(document_write_error)?;

        Ok(document)
    }

    /// Deletes the row and its stored file. A file already gone from storage
    /// does not fail the request.
    #[instrument(skip(db, storage))]
    pub async fn delete_document(
        db: &PgPool,
        storage: &dyn FileStorage,
        id: Uuid,
    ) -> Result<(), AppError> {
        let file_path = sqlx::query_scalar::<_, Option<String>>(
            "DELETE FROM documents WHERE id = $1 RETURNING file_path",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Document not found")))?;

        if let Some(key) = file_path
            && let Err(e) = storage.delete(&key).await
        {
            tracing::warn!(key = %key, error = %e, "Failed to remove stored document file");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_statuses() {
        assert_eq!(
            storage_error(StorageError::InvalidFileSize { max_bytes: 10 }).status,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            storage_error(StorageError::InvalidMimeType {
                received: "application/zip".to_string()
            })
            .status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            storage_error(StorageError::InvalidKey("..".to_string())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
