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

fn result_payload(student: Uuid, subject: Uuid, marks: f64, max: f64) -> Value {
    json!({
        "student_id": student,
        "subject_id": subject,
        "exam_type": "final",
        "term": "first",
        "academic_year": "2024/2025",
        "marks_obtained": marks,
        "max_marks": max
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_result_computes_grade(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::SubjectTeacher).await;
    let student = create_test_student(&pool, "SS1", None, None).await;
    let subject = create_test_subject(&pool, "SS1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/results",
        Some(&token),
        Some(result_payload(student, subject, 72.0, 100.0)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["grade"], "B");

    let (status, _) = send(
        &app,
        "POST",
        "/api/results",
        Some(&token),
        Some(result_payload(student, subject, 80.0, 100.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_marks_above_max_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::SubjectTeacher).await;
    let student = create_test_student(&pool, "SS1", None, None).await;
    let subject = create_test_subject(&pool, "SS1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/results",
        Some(&token),
        Some(result_payload(student, subject, 120.0, 100.0)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_recomputes_grade(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;
    let student = create_test_student(&pool, "SS1", None, None).await;
    let subject = create_test_subject(&pool, "SS1").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/results",
        Some(&token),
        Some(result_payload(student, subject, 45.0, 100.0)),
    )
    .await;
    assert_eq!(created["grade"], "E");
    let uri = format!("/api/results/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "marks_obtained": 91.0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A+");

    // shrinking max below the stored marks breaks the invariant
    let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "max_marks": 50.0 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_report_card(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let student = create_test_student(&pool, "SS2", None, None).await;
    let maths = create_test_subject(&pool, "SS2").await;
    let english = create_test_subject(&pool, "SS2").await;

    for (subject, marks) in [(maths, 80.0), (english, 60.0)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/results",
            Some(&token),
            Some(result_payload(student, subject, marks, 100.0)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/results/report-card/{}?term=first", student),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_obtained"], 140.0);
    assert_eq!(body["total_max"], 200.0);
    assert_eq!(body["percentage"], 70.0);
    assert_eq!(body["grade"], "B");
    assert_eq!(body["student"]["class_name"], "SS2");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_report_card(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let student = create_test_student(&pool, "SS2", None, None).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/results/report-card/{}", student),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"].as_array().unwrap().len(), 0);
    assert_eq!(body["grade"], "-");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/results/report-card/{}", Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_report_card_is_scoped(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let account = create_test_user(&pool, Role::Student).await;
    let own = create_test_student(&pool, "SS2", Some(account.id), None).await;
    let other = create_test_student(&pool, "SS2", None, None).await;
    let token = get_auth_token(&app, &account.email, &account.password).await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/results/report-card/{}", own),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/results/report-card/{}", other),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let subject = create_test_subject(&pool, "SS2").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/results",
        Some(&token),
        Some(result_payload(own, subject, 99.0, 100.0)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
