//! # EduDesk Models
//!
//! Database rows, request DTOs and response payloads for every EduDesk
//! module. Rows derive [`sqlx::FromRow`]; requests derive
//! [`validator::Validate`]; everything is documented through [`utoipa`].
//!
//! Each module also exports a `*_COLUMNS` constant listing the columns its
//! row type expects, so services select exactly what they decode.

pub mod admissions;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod documents;
pub mod fees;
pub mod notices;
pub mod permissions;
pub mod results;
pub mod students;
pub mod subjects;
pub mod submissions;
pub mod teachers;
pub mod timetable;
pub mod users;

pub use admissions::{Admission, AdmissionStatus};
pub use assignments::Assignment;
pub use attendance::{Attendance, AttendanceStatus};
pub use calendar::{CalendarEvent, EventType};
pub use documents::Document;
pub use fees::{Fee, FeeStatus};
pub use notices::{Notice, NoticePriority};
pub use permissions::ModuleAccess;
pub use results::ExamResult;
pub use students::Student;
pub use subjects::Subject;
pub use submissions::{Submission, SubmissionStatus};
pub use teachers::Teacher;
pub use timetable::TimetableEntry;
pub use users::User;
