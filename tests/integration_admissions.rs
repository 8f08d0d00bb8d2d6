mod common;

use axum::http::StatusCode;
use common::{generate_unique_code, login_as, send, setup_test_app};
use edudesk_core::Role;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn apply(app: &axum::Router, token: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/admissions",
        Some(token),
        Some(json!({
            "applicant_first_name": "Amaka",
            "applicant_last_name": "Eze",
            "applying_for_class": "JSS2",
            "guardian_name": "Ngozi Eze",
            "guardian_phone": "08030000000",
            "guardian_email": "Ngozi.Eze@Example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_application(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::NonTeachingStaff).await;

    let admission = apply(&app, &token).await;

    assert_eq!(admission["status"], "pending");
    assert_eq!(admission["guardian_email"], "ngozi.eze@example.com");
    assert!(admission["student_id"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approve_creates_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (reviewer, token) = login_as(&app, &pool, Role::Principal).await;
    let admission = apply(&app, &token).await;
    let id = admission["id"].as_str().unwrap();
    let admission_number = generate_unique_code("ADM");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/admissions/{}/approve", id),
        Some(&token),
        Some(json!({ "admission_number": admission_number, "section": "B" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["admission"]["status"], "approved");
    assert_eq!(body["admission"]["reviewed_by"], reviewer.id.to_string());
    assert_eq!(body["student"]["admission_number"], admission_number.as_str());
    // no class given, so the student lands in the class applied for
    assert_eq!(body["student"]["class_name"], "JSS2");
    assert_eq!(body["student"]["first_name"], "Amaka");
    assert_eq!(body["admission"]["student_id"], body["student"]["id"]);

    // a decided application cannot be decided again
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/admissions/{}/approve", id),
        Some(&token),
        Some(json!({ "admission_number": generate_unique_code("ADM") })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/admissions/{}/reject", id),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approve_with_taken_admission_number_rolls_back(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let taken = generate_unique_code("ADM");
    sqlx::query(
        "INSERT INTO students (admission_number, first_name, last_name, class_name) \
         VALUES ($1, 'Existing', 'Student', 'JSS1')",
    )
    .bind(&taken)
    .execute(&pool)
    .await
    .unwrap();
    let admission = apply(&app, &token).await;
    let id = admission["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/admissions/{}/approve", id),
        Some(&token),
        Some(json!({ "admission_number": taken })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", &format!("/api/admissions/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_and_waitlist(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let admission = apply(&app, &token).await;
    let id = admission["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/admissions/{}", id),
        Some(&token),
        Some(json!({ "status": "waitlisted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "waitlisted");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/admissions/{}", id),
        Some(&token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/admissions/{}/reject", id),
        Some(&token),
        Some(json!({ "notes": "Class is full" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["notes"], "Class is full");
    assert!(body["student_id"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filter_by_status(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    apply(&app, &token).await;
    let second = apply(&app, &token).await;
    send(
        &app,
        "POST",
        &format!("/api/admissions/{}/reject", second["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({})),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/admissions?status=pending", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_accountant_reads_only(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Accountant).await;

    let (status, _) = send(&app, "GET", "/api/admissions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/admissions",
        Some(&token),
        Some(json!({
            "applicant_first_name": "Amaka",
            "applicant_last_name": "Eze",
            "applying_for_class": "JSS1",
            "guardian_name": "Ngozi Eze",
            "guardian_phone": "08030000000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
