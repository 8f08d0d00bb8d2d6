//! Static role → module → access-level table.
//!
//! Every functional area of EduDesk is a [`Module`]. For each [`Role`] the
//! table below lists which modules it may reach and at which [`AccessLevel`]s.
//! The table is plain data; the lookup functions are pure and never fail,
//! answering `false` for anything the table does not grant.
//!
//! Levels are listed explicitly per entry and always nest:
//! `Admin` implies `Write`, which implies `Read`.
//!
//! # Example
//!
//! ```ignore
//! use edudesk_core::permissions::{AccessLevel, Module, can_write, has_permission};
//! use edudesk_core::roles::Role;
//!
//! assert!(has_permission(Role::Accountant, Module::Fees, AccessLevel::Admin));
//! assert!(!can_write(Role::Parent, Module::Attendance));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::Role;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [AccessLevel::Read, AccessLevel::Write, AccessLevel::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::Admin => "admin",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or(())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Dashboard,
    Students,
    Teachers,
    Attendance,
    Fees,
    Subjects,
    Timetable,
    Results,
    Documents,
    Notices,
    Assignments,
    Submissions,
    Calendar,
    Admissions,
    Users,
    Reports,
    Settings,
}

impl Module {
    /// Catalogue order, also used for navigation ordering.
    pub const ALL: [Module; 17] = [
        Module::Dashboard,
        Module::Students,
        Module::Teachers,
        Module::Attendance,
        Module::Fees,
        Module::Subjects,
        Module::Timetable,
        Module::Results,
        Module::Documents,
        Module::Notices,
        Module::Assignments,
        Module::Submissions,
        Module::Calendar,
        Module::Admissions,
        Module::Users,
        Module::Reports,
        Module::Settings,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Students => "students",
            Module::Teachers => "teachers",
            Module::Attendance => "attendance",
            Module::Fees => "fees",
            Module::Subjects => "subjects",
            Module::Timetable => "timetable",
            Module::Results => "results",
            Module::Documents => "documents",
            Module::Notices => "notices",
            Module::Assignments => "assignments",
            Module::Submissions => "submissions",
            Module::Calendar => "calendar",
            Module::Admissions => "admissions",
            Module::Users => "users",
            Module::Reports => "reports",
            Module::Settings => "settings",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Students => "Students",
            Module::Teachers => "Teachers",
            Module::Attendance => "Attendance",
            Module::Fees => "Fees",
            Module::Subjects => "Subjects",
            Module::Timetable => "Timetable",
            Module::Results => "Results",
            Module::Documents => "Documents",
            Module::Notices => "Notices",
            Module::Assignments => "Assignments",
            Module::Submissions => "Submissions",
            Module::Calendar => "Calendar",
            Module::Admissions => "Admissions",
            Module::Users => "Users",
            Module::Reports => "Reports",
            Module::Settings => "Settings",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Module::Dashboard => "Role-specific overview and statistics",
            Module::Students => "Student records and enrolment details",
            Module::Teachers => "Teaching staff records",
            Module::Attendance => "Daily attendance marking and summaries",
            Module::Fees => "Fee invoices and payments",
            Module::Subjects => "Subjects offered per class",
            Module::Timetable => "Weekly class timetable",
            Module::Results => "Examination results and report cards",
            Module::Documents => "Uploaded documents and certificates",
            Module::Notices => "School notices and announcements",
            Module::Assignments => "Homework and assignments",
            Module::Submissions => "Assignment submissions and grading",
            Module::Calendar => "Academic calendar and events",
            Module::Admissions => "Admission applications",
            Module::Users => "User accounts and roles",
            Module::Reports => "Aggregated reports",
            Module::Settings => "System settings",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Module {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL.into_iter().find(|m| m.key() == s).ok_or(())
    }
}

const R: &[AccessLevel] = &[AccessLevel::Read];
const W: &[AccessLevel] = &[AccessLevel::Read, AccessLevel::Write];
const A: &[AccessLevel] = &[AccessLevel::Read, AccessLevel::Write, AccessLevel::Admin];

type Grants = &'static [(Module, &'static [AccessLevel])];

const STUDENT: Grants = &[
    (Module::Dashboard, R),
    (Module::Students, R),
    (Module::Attendance, R),
    (Module::Fees, R),
    (Module::Subjects, R),
    (Module::Timetable, R),
    (Module::Results, R),
    (Module::Documents, R),
    (Module::Notices, R),
    (Module::Assignments, R),
    (Module::Submissions, W),
    (Module::Calendar, R),
];

const PARENT: Grants = &[
    (Module::Dashboard, R),
    (Module::Students, R),
    (Module::Attendance, R),
    (Module::Fees, R),
    (Module::Subjects, R),
    (Module::Timetable, R),
    (Module::Results, R),
    (Module::Documents, R),
    (Module::Notices, R),
    (Module::Assignments, R),
    (Module::Submissions, R),
    (Module::Calendar, R),
];

const SUBJECT_TEACHER: Grants = &[
    (Module::Dashboard, R),
    (Module::Students, R),
    (Module::Teachers, R),
    (Module::Attendance, W),
    (Module::Subjects, R),
    (Module::Timetable, R),
    (Module::Results, W),
    (Module::Documents, R),
    (Module::Notices, R),
    (Module::Assignments, W),
    (Module::Submissions, W),
    (Module::Calendar, R),
    (Module::Reports, R),
];

const CLASS_TEACHER: Grants = &[
    (Module::Dashboard, R),
    (Module::Students, W),
    (Module::Teachers, R),
    (Module::Attendance, W),
    (Module::Fees, R),
    (Module::Subjects, R),
    (Module::Timetable, R),
    (Module::Results, W),
    (Module::Documents, W),
    (Module::Notices, W),
    (Module::Assignments, W),
    (Module::Submissions, W),
    (Module::Calendar, R),
    (Module::Reports, R),
];

const NON_TEACHING_STAFF: Grants = &[
    (Module::Dashboard, R),
    (Module::Students, R),
    (Module::Teachers, R),
    (Module::Timetable, R),
    (Module::Documents, W),
    (Module::Notices, R),
    (Module::Calendar, R),
    (Module::Admissions, W),
];

const ACCOUNTANT: Grants = &[
    (Module::Dashboard, R),
    (Module::Students, R),
    (Module::Fees, A),
    (Module::Documents, R),
    (Module::Notices, R),
    (Module::Calendar, R),
    (Module::Admissions, R),
    (Module::Reports, R),
];

const PRINCIPAL: Grants = &[
    (Module::Dashboard, R),
    (Module::Students, A),
    (Module::Teachers, A),
    (Module::Attendance, A),
    (Module::Fees, W),
    (Module::Subjects, A),
    (Module::Timetable, A),
    (Module::Results, A),
    (Module::Documents, A),
    (Module::Notices, A),
    (Module::Assignments, W),
    (Module::Submissions, R),
    (Module::Calendar, A),
    (Module::Admissions, A),
    (Module::Users, R),
    (Module::Reports, A),
    (Module::Settings, R),
];

const ADMIN: Grants = &[
    (Module::Dashboard, A),
    (Module::Students, A),
    (Module::Teachers, A),
    (Module::Attendance, A),
    (Module::Fees, A),
    (Module::Subjects, A),
    (Module::Timetable, A),
    (Module::Results, A),
    (Module::Documents, A),
    (Module::Notices, A),
    (Module::Assignments, A),
    (Module::Submissions, A),
    (Module::Calendar, A),
    (Module::Admissions, A),
    (Module::Users, A),
    (Module::Reports, A),
    (Module::Settings, W),
];

const SUPER_ADMIN: Grants = &[
    (Module::Dashboard, A),
    (Module::Students, A),
    (Module::Teachers, A),
    (Module::Attendance, A),
    (Module::Fees, A),
    (Module::Subjects, A),
    (Module::Timetable, A),
    (Module::Results, A),
    (Module::Documents, A),
    (Module::Notices, A),
    (Module::Assignments, A),
    (Module::Submissions, A),
    (Module::Calendar, A),
    (Module::Admissions, A),
    (Module::Users, A),
    (Module::Reports, A),
    (Module::Settings, A),
];

/// The raw grants for a role, in catalogue order.
pub fn role_permissions(role: Role) -> &'static [(Module, &'static [AccessLevel])] {
    match role {
        Role::Student => STUDENT,
        Role::Parent => PARENT,
        Role::SubjectTeacher => SUBJECT_TEACHER,
        Role::ClassTeacher => CLASS_TEACHER,
        Role::NonTeachingStaff => NON_TEACHING_STAFF,
        Role::Accountant => ACCOUNTANT,
        Role::Principal => PRINCIPAL,
        Role::Admin => ADMIN,
        Role::SuperAdmin => SUPER_ADMIN,
    }
}

/// Levels a role holds on a module; empty when the module is not granted.
pub fn access_levels(role: Role, module: Module) -> &'static [AccessLevel] {
    role_permissions(role)
        .iter()
        .find(|(m, _)| *m == module)
        .map(|(_, levels)| *levels)
        .unwrap_or(&[])
}

pub fn has_permission(role: Role, module: Module, level: AccessLevel) -> bool {
    access_levels(role, module).contains(&level)
}

pub fn has_module_access(role: Role, module: Module) -> bool {
    !access_levels(role, module).is_empty()
}

pub fn can_write(role: Role, module: Module) -> bool {
    has_permission(role, module, AccessLevel::Write)
}

pub fn can_admin(role: Role, module: Module) -> bool {
    has_permission(role, module, AccessLevel::Admin)
}

/// Modules the role can reach at any level, in catalogue order.
pub fn get_accessible_modules(role: Role) -> Vec<Module> {
    Module::ALL
        .into_iter()
        .filter(|module| has_module_access(role, *module))
        .collect()
}

/// String-keyed [`has_permission`]; unknown role, module, or level yields `false`.
pub fn has_permission_str(role: &str, module: &str, level: &str) -> bool {
    match (
        role.parse::<Role>(),
        module.parse::<Module>(),
        level.parse::<AccessLevel>(),
    ) {
        (Ok(role), Ok(module), Ok(level)) => has_permission(role, module, level),
        _ => false,
    }
}

/// String-keyed [`get_accessible_modules`]; unknown role yields an empty list.
pub fn accessible_modules_str(role: &str) -> Vec<Module> {
    role.parse::<Role>()
        .map(get_accessible_modules)
        .unwrap_or_default()
}
