mod common;

use axum::http::StatusCode;
use common::{create_test_student, create_test_user, get_auth_token, login_as, send, setup_test_app};
use edudesk_core::Role;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_attendance(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (teacher, token) = login_as(&app, &pool, Role::SubjectTeacher).await;
    let student = create_test_student(&pool, "JSS1", None, None).await;

    let payload = json!({ "student_id": student, "date": "2025-03-10", "status": "present" });
    let (status, body) =
        send(&app, "POST", "/api/attendance", Some(&token), Some(payload.clone())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "present");
    assert_eq!(body["marked_by"], teacher.id.to_string());

    let (status, _) = send(&app, "POST", "/api/attendance", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_attendance_unknown_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::ClassTeacher).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&token),
        Some(json!({ "student_id": Uuid::new_v4(), "date": "2025-03-10", "status": "late" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_mark_last_write_wins(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::ClassTeacher).await;
    let first = create_test_student(&pool, "JSS1", None, None).await;
    let second = create_test_student(&pool, "JSS1", None, None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/attendance/bulk",
        Some(&token),
        Some(json!({
            "date": "2025-03-11",
            "records": [
                { "student_id": first, "status": "absent" },
                { "student_id": second, "status": "present" },
                { "student_id": first, "status": "late", "remarks": "Bus delay" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["marked"], 2);

    // re-submitting overwrites instead of conflicting
    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/bulk",
        Some(&token),
        Some(json!({
            "date": "2025-03-11",
            "records": [{ "student_id": second, "status": "excused" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let rows: Vec<(Uuid, String)> = sqlx::query_as(
        "SELECT student_id, status::text FROM attendance WHERE date = '2025-03-11' ORDER BY status",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.contains(&(first, "late".to_string())));
    assert!(rows.contains(&(second, "excused".to_string())));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_mark_rejects_empty_records(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::ClassTeacher).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/bulk",
        Some(&token),
        Some(json!({ "date": "2025-03-11", "records": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_summary_counts_and_percentage(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;
    let student = create_test_student(&pool, "SS1", None, None).await;

    for (date, status) in [
        ("2025-03-03", "present"),
        ("2025-03-04", "present"),
        ("2025-03-05", "late"),
        ("2025-03-06", "absent"),
        ("2025-04-01", "absent"),
    ] {
        sqlx::query(
            "INSERT INTO attendance (student_id, date, status) VALUES ($1, $2::date, $3::attendance_status)",
        )
        .bind(student)
        .bind(date)
        .bind(status)
        .execute(&pool)
        .await
        .unwrap();
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/attendance/summary/{}?from=2025-03-01&to=2025-03-31", student),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["present"], 2);
    assert_eq!(body["late"], 1);
    assert_eq!(body["absent"], 1);
    assert_eq!(body["excused"], 0);
    assert_eq!(body["percentage"], 75.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_summary_without_records(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;
    let student = create_test_student(&pool, "SS1", None, None).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/attendance/summary/{}", student),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["percentage"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_cannot_mark_or_see_other_children(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let parent = create_test_user(&pool, Role::Parent).await;
    let child = create_test_student(&pool, "JSS2", None, Some(parent.id)).await;
    let stranger = create_test_student(&pool, "JSS2", None, None).await;
    let token = get_auth_token(&app, &parent.email, &parent.password).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&token),
        Some(json!({ "student_id": child, "date": "2025-03-10", "status": "present" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/attendance/summary/{}", stranger),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/attendance/summary/{}", child),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_attendance(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let student = create_test_student(&pool, "JSS1", None, None).await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&token),
        Some(json!({ "student_id": student, "date": "2025-03-12", "status": "absent" })),
    )
    .await;
    let uri = format!("/api/attendance/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "status": "excused", "remarks": "Doctor's note" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "excused");

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
