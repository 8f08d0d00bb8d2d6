use edudesk_core::errors::{is_foreign_key_violation, map_unique_violation};
use edudesk_core::search::search_pattern;
use edudesk_core::{AppError, PaginationMeta};
use edudesk_models::admissions::{
    ADMISSION_COLUMNS, Admission, AdmissionFilterParams, AdmissionStatus, ApprovalResponse,
    ApproveAdmissionDto, CreateAdmissionDto, PaginatedAdmissionsResponse, RejectAdmissionDto,
    UpdateAdmissionDto,
};
use edudesk_models::students::{STUDENT_COLUMNS, Student};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::track_admission_decision;

fn not_open(action: &str) -> AppError {
    AppError::conflict(anyhow::anyhow!(
        "Only pending or waitlisted applications can be {}",
        action
    ))
}

/// Status changes allowed through a plain update.
fn resolve_status(
    current: AdmissionStatus,
    requested: Option<AdmissionStatus>,
) -> Result<AdmissionStatus, AppError> {
    match requested {
        None => Ok(current),
        Some(AdmissionStatus::Approved | AdmissionStatus::Rejected) => {
            Err(AppError::unprocessable(anyhow::anyhow!(
                "Use the approve or reject endpoints to decide an application"
            )))
        }
        Some(status) if current.is_open() => Ok(status),
        Some(_) => Err(not_open("moved back to the queue")),
    }
}

pub struct AdmissionService;

impl AdmissionService {
    #[instrument(skip(db, dto), fields(class = %dto.applying_for_class))]
    pub async fn create_admission(
        db: &PgPool,
        dto: CreateAdmissionDto,
    ) -> Result<Admission, AppError> {
        let admission = sqlx::query_as::<_, Admission>(&format!(
            r#"INSERT INTO admissions
                   (applicant_first_name, applicant_last_name, date_of_birth, gender,
                    applying_for_class, guardian_name, guardian_phone, guardian_email,
                    address, previous_school, notes)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING {}"#,
            ADMISSION_COLUMNS
        ))
        .bind(&dto.applicant_first_name)
        .bind(&dto.applicant_last_name)
        .bind(dto.date_of_birth)
        .bind(&dto.gender)
        .bind(&dto.applying_for_class)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(dto.guardian_email.as_deref().map(str::to_lowercase))
        .bind(&dto.address)
        .bind(&dto.previous_school)
        .bind(&dto.notes)
        .fetch_one(db)
        .await?;

        Ok(admission)
    }

    #[instrument(skip(db))]
    pub async fn get_admissions(
        db: &PgPool,
        filters: AdmissionFilterParams,
    ) -> Result<PaginatedAdmissionsResponse, AppError> {
        let search = search_pattern(filters.search.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM admissions
               WHERE ($1::admission_status IS NULL OR status = $1)
                 AND ($2::text IS NULL OR applying_for_class = $2)
                 AND ($3::text IS NULL
                      OR applicant_first_name || ' ' || applicant_last_name ILIKE $3
                      OR guardian_name ILIKE $3)"#,
        )
        .bind(filters.status)
        .bind(&filters.applying_for_class)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let admissions = sqlx::query_as::<_, Admission>(&format!(
            r#"SELECT {} FROM admissions
               WHERE ($1::admission_status IS NULL OR status = $1)
                 AND ($2::text IS NULL OR applying_for_class = $2)
                 AND ($3::text IS NULL
                      OR applicant_first_name || ' ' || applicant_last_name ILIKE $3
                      OR guardian_name ILIKE $3)
               ORDER BY created_at DESC
               LIMIT $4 OFFSET $5"#,
            ADMISSION_COLUMNS
        ))
        .bind(filters.status)
        .bind(&filters.applying_for_class)
        .bind(&search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAdmissionsResponse {
            data: admissions,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_admission(db: &PgPool, id: Uuid) -> Result<Admission, AppError> {
        sqlx::query_as::<_, Admission>(&format!(
            "SELECT {} FROM admissions WHERE id = $1",
            ADMISSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Admission not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_admission(
        db: &PgPool,
        id: Uuid,
        dto: UpdateAdmissionDto,
    ) -> Result<Admission, AppError> {
        let existing = Self::get_admission(db, id).await?;
        let status = resolve_status(existing.status, dto.status)?;

        let admission = sqlx::query_as::<_, Admission>(&format!(
            r#"UPDATE admissions
               SET applicant_first_name = $1, applicant_last_name = $2, date_of_birth = $3,
                   gender = $4, applying_for_class = $5, guardian_name = $6,
                   guardian_phone = $7, guardian_email = $8, address = $9,
                   previous_school = $10, status = $11, notes = $12, updated_at = NOW()
               WHERE id = $13
               RETURNING {}"#,
            ADMISSION_COLUMNS
        ))
        .bind(dto.applicant_first_name.unwrap_or(existing.applicant_first_name))
        .bind(dto.applicant_last_name.unwrap_or(existing.applicant_last_name))
        .bind(dto.date_of_birth.or(existing.date_of_birth))
        .bind(dto.gender.or(existing.gender))
        .bind(dto.applying_for_class.unwrap_or(existing.applying_for_class))
        .bind(dto.guardian_name.unwrap_or(existing.guardian_name))
        .bind(dto.guardian_phone.unwrap_or(existing.guardian_phone))
        .bind(
            dto.guardian_email
                .map(|e| e.to_lowercase())
                .or(existing.guardian_email),
        )
        .bind(dto.address.or(existing.address))
        .bind(dto.previous_school.or(existing.previous_school))
        .bind(status)
        .bind(dto.notes.or(existing.notes))
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(admission)
    }

    /// Creates the student record and closes the application in one
    /// transaction. The admission row is locked for the duration.
    #[instrument(skip(db, dto), fields(admission_number = %dto.admission_number))]
    pub async fn approve_admission(
        db: &PgPool,
        id: Uuid,
        reviewed_by: Uuid,
        dto: ApproveAdmissionDto,
    ) -> Result<ApprovalResponse, AppError> {
        let mut tx = db.begin().await?;

        let application = sqlx::query_as::<_, Admission>(&format!(
            "SELECT {} FROM admissions WHERE id = $1 FOR UPDATE",
            ADMISSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Admission not found")))?;

        if !application.status.is_open() {
            return Err(not_open("approved"));
        }

        let class_name = dto
            .class_name
            .clone()
            .unwrap_or_else(|| application.applying_for_class.clone());

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students
                   (parent_user_id, admission_number, first_name, last_name, date_of_birth,
                    gender, class_name, section, roll_number, guardian_name, guardian_phone,
                    address)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING {}"#,
            STUDENT_COLUMNS
        ))
        .bind(dto.parent_user_id)
        .bind(dto.admission_number.trim())
        .bind(&application.applicant_first_name)
        .bind(&application.applicant_last_name)
        .bind(application.date_of_birth)
        .bind(&application.gender)
        .bind(&class_name)
        .bind(&dto.section)
        .bind(&dto.roll_number)
        .bind(&application.guardian_name)
        .bind(&application.guardian_phone)
        .bind(&application.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::bad_request(anyhow::anyhow!("Parent user not found"));
            }
            map_unique_violation(e, "A student with this admission number already exists")
        })?;

        let admission = sqlx::query_as::<_, Admission>(&format!(
            r#"UPDATE admissions
               SET status = 'approved', student_id = $1, reviewed_by = $2,
                   reviewed_at = NOW(), updated_at = NOW()
               WHERE id = $3
               RETURNING {}"#,
            ADMISSION_COLUMNS
        ))
        .bind(student.id)
        .bind(reviewed_by)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        track_admission_decision("approved");
        tracing::info!(admission_id = %id, student_id = %student.id, "Admission approved");

        Ok(ApprovalResponse { admission, student })
    }

    #[instrument(skip(db, dto))]
    pub async fn reject_admission(
        db: &PgPool,
        id: Uuid,
        reviewed_by: Uuid,
        dto: RejectAdmissionDto,
    ) -> Result<Admission, AppError> {
        let rejected = sqlx::query_as::<_, Admission>(&format!(
            r#"UPDATE admissions
               SET status = 'rejected', notes = COALESCE($1, notes), reviewed_by = $2,
                   reviewed_at = NOW(), updated_at = NOW()
               WHERE id = $3 AND status IN ('pending', 'waitlisted')
               RETURNING {}"#,
            ADMISSION_COLUMNS
        ))
        .bind(&dto.notes)
        .bind(reviewed_by)
        .bind(id)
        .fetch_optional(db)
        .await?;

        match rejected {
            Some(admission) => {
                track_admission_decision("rejected");
                tracing::info!(admission_id = %id, "Admission rejected");
                Ok(admission)
            }
            None => {
                // distinguish a missing row from a decided one
                Self::get_admission(db, id).await?;
                Err(not_open("rejected"))
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn delete_admission(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM admissions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Admission not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_update_cannot_decide() {
        let err = resolve_status(AdmissionStatus::Pending, Some(AdmissionStatus::Approved))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let err = resolve_status(AdmissionStatus::Pending, Some(AdmissionStatus::Rejected))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_open_applications_can_be_waitlisted() {
        assert_eq!(
            resolve_status(AdmissionStatus::Pending, Some(AdmissionStatus::Waitlisted)).unwrap(),
            AdmissionStatus::Waitlisted
        );
        assert_eq!(
            resolve_status(AdmissionStatus::Waitlisted, Some(AdmissionStatus::Pending)).unwrap(),
            AdmissionStatus::Pending
        );
        assert_eq!(
            resolve_status(AdmissionStatus::Approved, None).unwrap(),
            AdmissionStatus::Approved
        );
    }

    #[test]
    fn test_decided_applications_stay_decided() {
        let err = resolve_status(AdmissionStatus::Rejected, Some(AdmissionStatus::Pending))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}
