//! Dashboard aggregation. Each block is computed only when the caller can
//! read the module behind it, and student-linked counts respect the caller's
//! row scope.

use chrono::Utc;
use edudesk_core::{AccessLevel, AppError, Module};
use edudesk_models::dashboard::{
    AdmissionStats, AttendanceTodayStats, DashboardResponse, HeadcountStats,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::scope::StudentScope;
use crate::modules::calendar::service::CalendarService;
use crate::modules::fees::service::FeeService;
use crate::modules::notices::controller::reader_for;
use crate::modules::notices::service::NoticeService;

pub const UPCOMING_EVENT_DAYS: i32 = 30;
pub const DASHBOARD_LIST_LIMIT: i64 = 5;

pub struct DashboardService;

impl DashboardService {
    async fn student_counts(db: &PgPool, scope: &StudentScope) -> Result<HeadcountStats, AppError> {
        let stats = sqlx::query_as::<_, HeadcountStats>(
            r#"SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE is_active) AS active
               FROM students
               WHERE ($1::uuid[] IS NULL OR id = ANY($1))"#,
        )
        .bind(scope.ids())
        .fetch_one(db)
        .await?;
        Ok(stats)
    }

    async fn teacher_counts(db: &PgPool) -> Result<HeadcountStats, AppError> {
        let stats = sqlx::query_as::<_, HeadcountStats>(
            r#"SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE is_active) AS active
               FROM teachers"#,
        )
        .fetch_one(db)
        .await?;
        Ok(stats)
    }

    async fn attendance_today(
        db: &PgPool,
        scope: &StudentScope,
    ) -> Result<AttendanceTodayStats, AppError> {
        let today = Utc::now().date_naive();
        let mut stats = sqlx::query_as::<_, AttendanceTodayStats>(
            r#"SELECT
                   COUNT(*) FILTER (WHERE status = 'present') AS present,
                   COUNT(*) FILTER (WHERE status = 'absent') AS absent,
                   COUNT(*) FILTER (WHERE status = 'late') AS late,
                   COUNT(*) FILTER (WHERE status = 'excused') AS excused,
                   COUNT(*) AS total
               FROM attendance
               WHERE date = $1
                 AND ($2::uuid[] IS NULL OR student_id = ANY($2))"#,
        )
        .bind(today)
        .bind(scope.ids())
        .fetch_one(db)
        .await?;
        stats.date = Some(today);
        Ok(stats)
    }

    async fn admission_counts(db: &PgPool) -> Result<AdmissionStats, AppError> {
        let stats = sqlx::query_as::<_, AdmissionStats>(
            r#"SELECT
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE status = 'waitlisted') AS waitlisted
               FROM admissions"#,
        )
        .fetch_one(db)
        .await?;
        Ok(stats)
    }

    #[instrument(skip(db, auth_user), fields(role = %auth_user.role()))]
    pub async fn get_dashboard(
        db: &PgPool,
        auth_user: &AuthUser,
    ) -> Result<DashboardResponse, AppError> {
        let mut dashboard = DashboardResponse::empty(auth_user.role());
        let can_read = |module| auth_user.can(module, AccessLevel::Read);
        let scope = StudentScope::for_user(db, auth_user).await?;

        if can_read(Module::Students) {
            dashboard.students = Some(Self::student_counts(db, &scope).await?);
        }
        if can_read(Module::Teachers) {
            dashboard.teachers = Some(Self::teacher_counts(db).await?);
        }
        if can_read(Module::Attendance) {
            dashboard.attendance_today = Some(Self::attendance_today(db, &scope).await?);
        }
        if can_read(Module::Fees) {
            dashboard.fees = Some(FeeService::get_summary(db, &scope, None).await?);
        }
        if can_read(Module::Admissions) {
            dashboard.admissions = Some(Self::admission_counts(db).await?);
        }
        if can_read(Module::Calendar) {
            dashboard.upcoming_events = Some(
                CalendarService::upcoming(db, UPCOMING_EVENT_DAYS, DASHBOARD_LIST_LIMIT).await?,
            );
        }
        if can_read(Module::Notices) {
            dashboard.recent_notices = Some(
                NoticeService::latest(db, reader_for(auth_user), DASHBOARD_LIST_LIMIT).await?,
            );
        }

        Ok(dashboard)
    }
}
