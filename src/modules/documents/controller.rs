use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::StatusCode,
};
use edudesk_core::AppError;
use edudesk_models::documents::{
    CreateDocumentDto, Document, DocumentFilterParams, PaginatedDocumentsResponse,
    UpdateDocumentDto, UploadDocumentFields, UploadDocumentForm,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::{RequireDocumentsAdmin, RequireDocumentsRead, RequireDocumentsWrite};
use crate::middleware::scope::StudentScope;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::documents::service::{DocumentService, UploadedFile};
use crate::state::AppState;
use crate::validator::{ValidatedJson, format_errors};

fn parse_optional_uuid(name: &str, value: &str) -> Result<Option<Uuid>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(value)
        .map(Some)
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("{} must be a valid UUID", name)))
}

/// Keeps the rejection's own status, so a body over the size limit is a 413.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    AppError::new(err.status(), anyhow::anyhow!("{}: {}", context, err.body_text()))
}

/// Splits an upload form into its text fields and the single `file` part.
async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<(UploadDocumentFields, UploadedFile), AppError> {
    let mut fields = UploadDocumentFields::default();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            if file.is_some() {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Only one file can be uploaded at a time"
                )));
            }
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read file", e))?;
            file = Some(UploadedFile {
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| multipart_error("Invalid form field", e))?;

        match name.as_str() {
            "title" => fields.title = value.trim().to_string(),
            "document_type" => fields.document_type = value.trim().to_string(),
            "description" => fields.description = Some(value).filter(|v| !v.trim().is_empty()),
            "student_id" => fields.student_id = parse_optional_uuid("student_id", &value)?,
            "teacher_id" => fields.teacher_id = parse_optional_uuid("teacher_id", &value)?,
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::bad_request(anyhow::anyhow!("file is required")))?;
    fields
        .validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!(format_errors(&e))))?;

    Ok((fields, file))
}

#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentDto,
    responses(
        (status = 201, description = "Document registered", body = Document),
        (status = 400, description = "Student or teacher not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to documents", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_document(
    State(state): State<AppState>,
    RequireDocumentsWrite(auth_user): RequireDocumentsWrite,
    ValidatedJson(dto): ValidatedJson<CreateDocumentDto>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let uploaded_by = auth_user.user_id()?;
    let document = DocumentService::create_document(&state.db, uploaded_by, dto).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    post,
    path = "/api/documents/upload",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored and document created", body = Document),
        (status = 400, description = "Missing file, bad field, or file type not allowed", body = ErrorResponse),
        (status = 403, description = "Missing write access to documents", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    RequireDocumentsWrite(auth_user): RequireDocumentsWrite,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let uploaded_by = auth_user.user_id()?;
    let (fields, file) = read_upload_form(multipart).await?;
    let document = DocumentService::upload_document(
        &state.db,
        state.storage.as_ref(),
        uploaded_by,
        fields,
        file,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    get,
    path = "/api/documents",
    params(DocumentFilterParams),
    responses(
        (status = 200, description = "Documents visible to the caller", body = PaginatedDocumentsResponse),
        (status = 403, description = "Missing read access to documents", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_documents(
    State(state): State<AppState>,
    RequireDocumentsRead(auth_user): RequireDocumentsRead,
    Query(filters): Query<DocumentFilterParams>,
) -> Result<Json<PaginatedDocumentsResponse>, AppError> {
    let scope = StudentScope::for_user(&state.db, &auth_user).await?;
    Ok(Json(
        DocumentService::get_documents(&state.db, &scope, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document details", body = Document),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_document(
    State(state): State<AppState>,
    RequireDocumentsRead(auth_user): RequireDocumentsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, AppError> {
    let document = DocumentService::get_document(&state.db, id).await?;
    if let Some(student_id) = document.student_id {
        StudentScope::for_user(&state.db, &auth_user)
            .await?
            .ensure(student_id)?;
    }
    Ok(Json(document))
}

#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateDocumentDto,
    responses(
        (status = 200, description = "Document updated", body = Document),
        (status = 400, description = "Student or teacher not found", body = ErrorResponse),
        (status = 403, description = "Missing write access to documents", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, dto))]
pub async fn update_document(
    State(state): State<AppState>,
    RequireDocumentsWrite(_auth_user): RequireDocumentsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateDocumentDto>,
) -> Result<Json<Document>, AppError> {
    Ok(Json(
        DocumentService::update_document(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document and stored file deleted"),
        (status = 403, description = "Missing admin access to documents", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_document(
    State(state): State<AppState>,
    RequireDocumentsAdmin(_auth_user): RequireDocumentsAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    DocumentService::delete_document(&state.db, state.storage.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
