use edudesk_core::{AccessLevel, Module, PaginationMeta, PaginationParams, Role};
use edudesk_models::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RefreshTokenRequest,
};
use edudesk_models::permissions::{
    ModuleAccess, ModuleRecord, MyPermissionsResponse, PermissionCheckResponse, RoleInfo,
    RolePermissions,
};
use edudesk_models::users::{CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User};
use edudesk_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, UpdateStudentDto,
};
use edudesk_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, UpdateTeacherDto,
};
use edudesk_models::subjects::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, UpdateSubjectDto,
};
use edudesk_models::attendance::{
    Attendance, AttendanceStatus, AttendanceSummary, BulkAttendanceDto, BulkAttendanceEntry,
    BulkAttendanceResponse, CreateAttendanceDto, PaginatedAttendanceResponse, UpdateAttendanceDto,
};
use edudesk_models::fees::{
    CreateFeeDto, Fee, FeeStatus, FeeSummary, PaginatedFeesResponse, RecordPaymentDto, UpdateFeeDto,
};
use edudesk_models::timetable::{
    CreateTimetableEntryDto, PaginatedTimetableResponse, TimetableEntry, UpdateTimetableEntryDto,
};
use edudesk_models::results::{
    CreateResultDto, ExamResult, PaginatedResultsResponse, ReportCard, ReportCardEntry,
    ReportCardStudent, UpdateResultDto,
};
use edudesk_models::documents::{
    CreateDocumentDto, Document, PaginatedDocumentsResponse, UpdateDocumentDto, UploadDocumentForm,
};
use edudesk_models::notices::{
    CreateNoticeDto, Notice, NoticePriority, PaginatedNoticesResponse, UpdateNoticeDto,
};
use edudesk_models::assignments::{
    Assignment, CreateAssignmentDto, PaginatedAssignmentsResponse, UpdateAssignmentDto,
};
use edudesk_models::submissions::{
    CreateSubmissionDto, GradeSubmissionDto, PaginatedSubmissionsResponse, Submission,
    SubmissionStatus, UpdateSubmissionDto,
};
use edudesk_models::calendar::{
    CalendarEvent, CreateCalendarEventDto, EventType, PaginatedCalendarEventsResponse,
    UpdateCalendarEventDto,
};
use edudesk_models::admissions::{
    Admission, AdmissionStatus, ApprovalResponse, ApproveAdmissionDto, CreateAdmissionDto,
    PaginatedAdmissionsResponse, RejectAdmissionDto, UpdateAdmissionDto,
};
use edudesk_models::dashboard::{
    AdmissionStats, AttendanceTodayStats, DashboardResponse, HeadcountStats,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::get_me,
        crate::modules::auth::controller::change_password,
        crate::modules::permissions::controller::get_roles,
        crate::modules::permissions::controller::get_modules,
        crate::modules::permissions::controller::get_matrix,
        crate::modules::permissions::controller::get_my_permissions,
        crate::modules::permissions::controller::check_permission,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::attendance::controller::create_attendance,
        crate::modules::attendance::controller::bulk_mark_attendance,
        crate::modules::attendance::controller::get_attendance_list,
        crate::modules::attendance::controller::get_attendance,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::attendance::controller::get_attendance_summary,
        crate::modules::fees::controller::create_fee,
        crate::modules::fees::controller::get_fees,
        crate::modules::fees::controller::get_fee_summary,
        crate::modules::fees::controller::get_fee,
        crate::modules::fees::controller::update_fee,
        crate::modules::fees::controller::record_payment,
        crate::modules::fees::controller::delete_fee,
        crate::modules::timetable::controller::create_entry,
        crate::modules::timetable::controller::get_entries,
        crate::modules::timetable::controller::get_entry,
        crate::modules::timetable::controller::update_entry,
        crate::modules::timetable::controller::delete_entry,
        crate::modules::results::controller::create_result,
        crate::modules::results::controller::get_results,
        crate::modules::results::controller::get_report_card,
        crate::modules::results::controller::get_result,
        crate::modules::results::controller::update_result,
        crate::modules::results::controller::delete_result,
        crate::modules::documents::controller::create_document,
        crate::modules::documents::controller::upload_document,
        crate::modules::documents::controller::get_documents,
        crate::modules::documents::controller::get_document,
        crate::modules::documents::controller::update_document,
        crate::modules::documents::controller::delete_document,
        crate::modules::notices::controller::create_notice,
        crate::modules::notices::controller::get_notices,
        crate::modules::notices::controller::get_notice,
        crate::modules::notices::controller::update_notice,
        crate::modules::notices::controller::delete_notice,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::get_assignments,
        crate::modules::assignments::controller::get_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::submissions::controller::create_submission,
        crate::modules::submissions::controller::get_submissions,
        crate::modules::submissions::controller::get_submission,
        crate::modules::submissions::controller::update_submission,
        crate::modules::submissions::controller::grade_submission,
        crate::modules::submissions::controller::delete_submission,
        crate::modules::calendar::controller::create_event,
        crate::modules::calendar::controller::get_events,
        crate::modules::calendar::controller::get_event,
        crate::modules::calendar::controller::update_event,
        crate::modules::calendar::controller::delete_event,
        crate::modules::admissions::controller::create_admission,
        crate::modules::admissions::controller::get_admissions,
        crate::modules::admissions::controller::get_admission,
        crate::modules::admissions::controller::update_admission,
        crate::modules::admissions::controller::delete_admission,
        crate::modules::admissions::controller::approve_admission,
        crate::modules::admissions::controller::reject_admission,
        crate::modules::dashboard::controller::get_dashboard,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            Role,
            Module,
            AccessLevel,
            ChangePasswordRequest,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ProfileResponse,
            RefreshTokenRequest,
            ModuleAccess,
            ModuleRecord,
            MyPermissionsResponse,
            PermissionCheckResponse,
            RoleInfo,
            RolePermissions,
            CreateUserDto,
            PaginatedUsersResponse,
            UpdateUserDto,
            User,
            CreateStudentDto,
            PaginatedStudentsResponse,
            Student,
            UpdateStudentDto,
            CreateTeacherDto,
            PaginatedTeachersResponse,
            Teacher,
            UpdateTeacherDto,
            CreateSubjectDto,
            PaginatedSubjectsResponse,
            Subject,
            UpdateSubjectDto,
            Attendance,
            AttendanceStatus,
            AttendanceSummary,
            BulkAttendanceDto,
            BulkAttendanceEntry,
            BulkAttendanceResponse,
            CreateAttendanceDto,
            PaginatedAttendanceResponse,
            UpdateAttendanceDto,
            CreateFeeDto,
            Fee,
            FeeStatus,
            FeeSummary,
            PaginatedFeesResponse,
            RecordPaymentDto,
            UpdateFeeDto,
            CreateTimetableEntryDto,
            PaginatedTimetableResponse,
            TimetableEntry,
            UpdateTimetableEntryDto,
            CreateResultDto,
            ExamResult,
            PaginatedResultsResponse,
            ReportCard,
            ReportCardEntry,
            ReportCardStudent,
            UpdateResultDto,
            CreateDocumentDto,
            Document,
            PaginatedDocumentsResponse,
            UpdateDocumentDto,
            UploadDocumentForm,
            CreateNoticeDto,
            Notice,
            NoticePriority,
            PaginatedNoticesResponse,
            UpdateNoticeDto,
            Assignment,
            CreateAssignmentDto,
            PaginatedAssignmentsResponse,
            UpdateAssignmentDto,
            CreateSubmissionDto,
            GradeSubmissionDto,
            PaginatedSubmissionsResponse,
            Submission,
            SubmissionStatus,
            UpdateSubmissionDto,
            CalendarEvent,
            CreateCalendarEventDto,
            EventType,
            PaginatedCalendarEventsResponse,
            UpdateCalendarEventDto,
            Admission,
            AdmissionStatus,
            ApprovalResponse,
            ApproveAdmissionDto,
            CreateAdmissionDto,
            PaginatedAdmissionsResponse,
            RejectAdmissionDto,
            UpdateAdmissionDto,
            AdmissionStats,
            AttendanceTodayStats,
            DashboardResponse,
            HeadcountStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Login, token refresh and profile"),
        (name = "Permissions", description = "Role and module access catalogue"),
        (name = "Dashboard", description = "Role-aware overview"),
        (name = "Users", description = "User account management"),
        (name = "Students", description = "Student records"),
        (name = "Teachers", description = "Teacher records"),
        (name = "Subjects", description = "Subjects and their teachers"),
        (name = "Attendance", description = "Daily attendance marking and summaries"),
        (name = "Fees", description = "Fee invoices and payments"),
        (name = "Timetable", description = "Weekly class timetable"),
        (name = "Results", description = "Exam results and report cards"),
        (name = "Documents", description = "Document metadata and uploads"),
        (name = "Notices", description = "School notices"),
        (name = "Assignments", description = "Homework and assignments"),
        (name = "Submissions", description = "Assignment submissions and grading"),
        (name = "Calendar", description = "Academic calendar events"),
        (name = "Admissions", description = "Admission applications")
    ),
    info(
        title = "EduDesk API",
        version = "0.1.0",
        description = "School management REST API built with Axum and PostgreSQL, with per-module role-based access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_declares_bearer_auth() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_openapi_lists_core_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/auth/login",
            "/api/fees/{id}/payments",
            "/api/results/report-card/{student_id}",
            "/api/admissions/{id}/approve",
            "/api/calendar-events",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
