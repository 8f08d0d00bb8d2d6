use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edudesk_core::{AppError, Role};
use edudesk_models::submissions::{
    CreateSubmissionDto, GradeSubmissionDto, PaginatedSubmissionsResponse, Submission,
    SubmissionFilterParams, UpdateSubmissionDto,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{
    AuthUser, RequireSubmissionsAdmin, RequireSubmissionsRead, RequireSubmissionsWrite,
};
use crate::middleware::scope::{StudentScope, own_student_id};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::submissions::service::SubmissionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn ensure_staff(auth_user: &AuthUser) -> Result<(), AppError> {
    if auth_user.role().is_staff() {
        return Ok(());
    }
    Err(AppError::forbidden(
        "Access denied. Only staff can grade submissions".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission recorded; late if past due", body = Submission),
        (status = 400, description = "Student not found", body = ErrorResponse),
        (status = 403, description = "Missing write access, or no linked student record", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse),
        (status = 409, description = "Already submitted", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_submission(
    State(state): State<AppState>,
    RequireSubmissionsWrite(auth_user): RequireSubmissionsWrite,
    ValidatedJson(dto): ValidatedJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let student_id = if auth_user.role() == Role::Student {
        own_student_id(&state.db, &auth_user).await?
    } else {
        dto.student_id.ok_or_else(|| {
            AppError::unprocessable(anyhow::anyhow!(
                "student_id is required when submitting on behalf of a student"
            ))
        })?
    };

    let submission = SubmissionService::create_submission(&state.db, student_id, dto).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

#[utoipa::path(
    get,
    path = "/api/submissions",
    params(SubmissionFilterParams),
    responses(
        (status = 200, description = "Submissions visible to the caller", body = PaginatedSubmissionsResponse),
        (status = 403, description = "Missing read access to submissions", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_submissions(
    State(state): State<AppState>,
    RequireSubmissionsRead(auth_user): RequireSubmissionsRead,
    Query(filters): Query<SubmissionFilterParams>,
) -> Result<Json<PaginatedSubmissionsResponse>, AppError> {
    let scope = StudentScope::for_user(&state.db, &auth_user).await?;
    Ok(Json(
        SubmissionService::get_submissions(&state.db, &scope, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission details", body = Submission),
        (status = 403, description = "Missing read access, or not your record", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_submission(
    State(state): State<AppState>,
    RequireSubmissionsRead(auth_user): RequireSubmissionsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, AppError> {
    let submission = SubmissionService::get_submission(&state.db, id).await?;
    StudentScope::for_user(&state.db, &auth_user)
        .await?
        .ensure(submission.student_id)?;
    Ok(Json(submission))
}

#[utoipa::path(
    put,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = UpdateSubmissionDto,
    responses(
        (status = 200, description = "Submission content updated", body = Submission),
        (status = 403, description = "Missing write access, or not your submission", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 409, description = "Submission already graded", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_submission(
    State(state): State<AppState>,
    RequireSubmissionsWrite(auth_user): RequireSubmissionsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSubmissionDto>,
) -> Result<Json<Submission>, AppError> {
    let existing = SubmissionService::get_submission(&state.db, id).await?;
    StudentScope::for_user(&state.db, &auth_user)
        .await?
        .ensure(existing.student_id)?;
    Ok(Json(
        SubmissionService::update_submission(&state.db, existing, dto).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/submissions/{id}/grade",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = GradeSubmissionDto,
    responses(
        (status = 200, description = "Submission graded", body = Submission),
        (status = 403, description = "Missing write access, or caller is not staff", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 422, description = "Marks exceed the assignment maximum", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn grade_submission(
    State(state): State<AppState>,
    RequireSubmissionsWrite(auth_user): RequireSubmissionsWrite,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<GradeSubmissionDto>,
) -> Result<Json<Submission>, AppError> {
    ensure_staff(&auth_user)?;
    let graded_by = auth_user.user_id()?;
    Ok(Json(
        SubmissionService::grade_submission(&state.db, id, graded_by, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 403, description = "Missing admin access to submissions", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_submission(
    State(state): State<AppState>,
    RequireSubmissionsAdmin(_auth_user): RequireSubmissionsAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    SubmissionService::delete_submission(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
