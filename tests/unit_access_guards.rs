use edudesk::edudesk_auth::Claims;
use edudesk::edudesk_core::permissions::{accessible_modules_str, has_permission_str};
use edudesk::edudesk_core::{AccessLevel, Module, Role};
use edudesk::middleware::auth::AuthUser;

fn create_test_auth_user(role: Role) -> AuthUser {
    AuthUser(Claims {
        sub: "00000000-0000-0000-0000-000000000000".to_string(),
        email: "test@school.test".to_string(),
        role,
        exp: 9999999999,
        iat: 1234567890,
    })
}

#[test]
fn test_admin_roles_pass_every_module_read() {
    for role in [Role::Admin, Role::SuperAdmin] {
        let user = create_test_auth_user(role);
        for module in Module::ALL {
            assert!(user.require(module, AccessLevel::Read).is_ok(), "{role} {module}");
        }
    }
}

#[test]
fn test_only_super_admin_administers_settings() {
    let admin = create_test_auth_user(Role::Admin);
    assert!(admin.require(Module::Settings, AccessLevel::Write).is_ok());
    assert!(admin.require(Module::Settings, AccessLevel::Admin).is_err());

    let super_admin = create_test_auth_user(Role::SuperAdmin);
    assert!(super_admin.require(Module::Settings, AccessLevel::Admin).is_ok());
}

#[test]
fn test_teachers_write_attendance_but_not_fees() {
    for role in [Role::SubjectTeacher, Role::ClassTeacher] {
        let user = create_test_auth_user(role);
        assert!(user.require(Module::Attendance, AccessLevel::Write).is_ok());
        assert!(user.require(Module::Fees, AccessLevel::Write).is_err());
    }
}

#[test]
fn test_student_submits_but_cannot_grade() {
    let student = create_test_auth_user(Role::Student);
    assert!(student.require(Module::Submissions, AccessLevel::Write).is_ok());
    assert!(student.require(Module::Results, AccessLevel::Write).is_err());
    assert!(student.require(Module::Users, AccessLevel::Read).is_err());
}

#[test]
fn test_rejection_is_forbidden() {
    let err = create_test_auth_user(Role::Parent)
        .require(Module::Fees, AccessLevel::Write)
        .unwrap_err();
    assert_eq!(err.status.as_u16(), 403);
    assert!(err.error.to_string().contains("fees"));
}

#[test]
fn test_string_lookups_reject_unknown_names() {
    assert!(has_permission_str("accountant", "fees", "admin"));
    assert!(!has_permission_str("accountant", "attendance", "read"));
    assert!(!has_permission_str("janitor", "fees", "read"));
    assert!(!has_permission_str("admin", "cafeteria", "read"));
    assert!(!has_permission_str("admin", "fees", "owner"));
    assert!(accessible_modules_str("nobody").is_empty());
}
