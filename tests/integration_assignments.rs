mod common;

use axum::http::StatusCode;
use common::{
    create_test_student, create_test_subject, create_test_user, get_auth_token, login_as, send,
    setup_test_app,
};
use edudesk_core::Role;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

async fn create_assignment(app: &axum::Router, token: &str, subject: Uuid, due: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/assignments",
        Some(token),
        Some(json!({
            "title": "Fractions worksheet",
            "subject_id": subject,
            "class_name": "JSS1",
            "due_date": due
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_assignment_defaults_max_marks(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::SubjectTeacher).await;
    let subject = create_test_subject(&pool, "JSS1").await;

    let assignment = create_assignment(&app, &token, subject, "2099-06-01T12:00:00Z").await;
    assert_eq!(assignment["max_marks"], 100.0);

    let (status, _) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&token),
        Some(json!({
            "title": "Orphan",
            "subject_id": Uuid::new_v4(),
            "class_name": "JSS1",
            "due_date": "2099-06-01T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_submits_and_teacher_grades(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (teacher, teacher_token) = login_as(&app, &pool, Role::SubjectTeacher).await;
    let account = create_test_user(&pool, Role::Student).await;
    let student = create_test_student(&pool, "JSS1", Some(account.id), None).await;
    let student_token = get_auth_token(&app, &account.email, &account.password).await;
    let subject = create_test_subject(&pool, "JSS1").await;
    let assignment = create_assignment(&app, &teacher_token, subject, "2099-06-01T12:00:00Z").await;
    let assignment_id = assignment["id"].as_str().unwrap();

    let (status, submission) = send(
        &app,
        "POST",
        "/api/submissions",
        Some(&student_token),
        Some(json!({ "assignment_id": assignment_id, "content": "1/2 + 1/4 = 3/4" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", submission);
    assert_eq!(submission["student_id"], student.to_string());
    assert_eq!(submission["status"], "submitted");
    let uri = format!("/api/submissions/{}", submission["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        "POST",
        "/api/submissions",
        Some(&student_token),
        Some(json!({ "assignment_id": assignment_id, "content": "again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // students cannot grade their own work
    let (status, _) = send(
        &app,
        "PUT",
        &format!("{}/grade", uri),
        Some(&student_token),
        Some(json!({ "marks": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("{}/grade", uri),
        Some(&teacher_token),
        Some(json!({ "marks": 150.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, graded) = send(
        &app,
        "PUT",
        &format!("{}/grade", uri),
        Some(&teacher_token),
        Some(json!({ "marks": 85.0, "feedback": "Good work" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(graded["status"], "graded");
    assert_eq!(graded["marks"], 85.0);
    assert_eq!(graded["graded_by"], teacher.id.to_string());

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&student_token),
        Some(json!({ "content": "edited after grading" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submission_after_due_date_is_late(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, teacher_token) = login_as(&app, &pool, Role::ClassTeacher).await;
    let account = create_test_user(&pool, Role::Student).await;
    create_test_student(&pool, "JSS1", Some(account.id), None).await;
    let student_token = get_auth_token(&app, &account.email, &account.password).await;
    let subject = create_test_subject(&pool, "JSS1").await;
    let assignment = create_assignment(&app, &teacher_token, subject, "2020-01-01T00:00:00Z").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/submissions",
        Some(&student_token),
        Some(json!({ "assignment_id": assignment["id"], "file_url": "https://files.test/a.pdf" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "late");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submission_needs_content_or_file(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, teacher_token) = login_as(&app, &pool, Role::ClassTeacher).await;
    let account = create_test_user(&pool, Role::Student).await;
    create_test_student(&pool, "JSS1", Some(account.id), None).await;
    let student_token = get_auth_token(&app, &account.email, &account.password).await;
    let subject = create_test_subject(&pool, "JSS1").await;
    let assignment = create_assignment(&app, &teacher_token, subject, "2099-01-01T00:00:00Z").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/submissions",
        Some(&student_token),
        Some(json!({ "assignment_id": assignment["id"] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_without_record_cannot_submit(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, teacher_token) = login_as(&app, &pool, Role::ClassTeacher).await;
    let (_, student_token) = login_as(&app, &pool, Role::Student).await;
    let subject = create_test_subject(&pool, "JSS1").await;
    let assignment = create_assignment(&app, &teacher_token, subject, "2099-01-01T00:00:00Z").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/submissions",
        Some(&student_token),
        Some(json!({ "assignment_id": assignment["id"], "content": "hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_lists_only_childrens_submissions(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, teacher_token) = login_as(&app, &pool, Role::ClassTeacher).await;
    let parent = create_test_user(&pool, Role::Parent).await;
    let child = create_test_student(&pool, "JSS1", None, Some(parent.id)).await;
    let other = create_test_student(&pool, "JSS1", None, None).await;
    let subject = create_test_subject(&pool, "JSS1").await;
    let assignment = create_assignment(&app, &teacher_token, subject, "2099-01-01T00:00:00Z").await;

    for student in [child, other] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/submissions",
            Some(&teacher_token),
            Some(json!({
                "assignment_id": assignment["id"],
                "student_id": student,
                "content": "handed in on paper"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let token = get_auth_token(&app, &parent.email, &parent.password).await;
    let (status, body) = send(&app, "GET", "/api/submissions", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["student_id"], child.to_string());
}
