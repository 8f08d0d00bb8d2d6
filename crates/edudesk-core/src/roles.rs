//! User roles.
//!
//! EduDesk has a fixed set of nine roles. A user holds exactly one role, stored
//! in the `users.role` column as the PostgreSQL enum `user_role`, and carried in
//! the access token's `role` claim using the same snake_case spelling.
//!
//! What each role may reach is decided by the static table in
//! [`crate::permissions`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    Student,
    Parent,
    SubjectTeacher,
    ClassTeacher,
    NonTeachingStaff,
    Accountant,
    Principal,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Every role, lowest privilege first.
    pub const ALL: [Role; 9] = [
        Role::Student,
        Role::Parent,
        Role::SubjectTeacher,
        Role::ClassTeacher,
        Role::NonTeachingStaff,
        Role::Accountant,
        Role::Principal,
        Role::Admin,
        Role::SuperAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Parent => "parent",
            Role::SubjectTeacher => "subject_teacher",
            Role::ClassTeacher => "class_teacher",
            Role::NonTeachingStaff => "non_teaching_staff",
            Role::Accountant => "accountant",
            Role::Principal => "principal",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Parent => "Parent",
            Role::SubjectTeacher => "Subject Teacher",
            Role::ClassTeacher => "Class Teacher",
            Role::NonTeachingStaff => "Non-Teaching Staff",
            Role::Accountant => "Accountant",
            Role::Principal => "Principal",
            Role::Admin => "Administrator",
            Role::SuperAdmin => "Super Administrator",
        }
    }

    /// Position in the role hierarchy (higher = more privileges).
    pub fn level(&self) -> u8 {
        match self {
            Role::Student => 0,
            Role::Parent => 1,
            Role::SubjectTeacher => 2,
            Role::ClassTeacher => 3,
            Role::NonTeachingStaff => 4,
            Role::Accountant => 5,
            Role::Principal => 6,
            Role::Admin => 7,
            Role::SuperAdmin => 8,
        }
    }

    /// Students and parents are the only non-staff roles.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Student | Role::Parent)
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::SubjectTeacher | Role::ClassTeacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("headmaster".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_levels_are_strictly_increasing() {
        let levels: Vec<u8> = Role::ALL.iter().map(Role::level).collect();
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Role::SuperAdmin.level(), 8);
        assert_eq!(Role::Student.level(), 0);
    }

    #[test]
    fn test_staff_classification() {
        assert!(!Role::Student.is_staff());
        assert!(!Role::Parent.is_staff());
        assert!(Role::Accountant.is_staff());
        assert!(Role::ClassTeacher.is_teacher());
        assert!(!Role::Principal.is_teacher());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::NonTeachingStaff).unwrap();
        assert_eq!(json, "\"non_teaching_staff\"");
        let role: Role = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }
}
