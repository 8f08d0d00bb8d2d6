mod common;

use axum::http::StatusCode;
use common::{create_test_subject, create_test_teacher, login_as, send, setup_test_app};
use edudesk_core::Role;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

fn entry(class: &str, day: i16, period: i16, subject: Uuid, teacher: Option<Uuid>) -> Value {
    json!({
        "class_name": class,
        "section": "A",
        "day_of_week": day,
        "period": period,
        "subject_id": subject,
        "teacher_id": teacher,
        "start_time": "08:00:00",
        "end_time": "08:40:00",
        "room": "Lab 1"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_list_entries(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;
    let subject = create_test_subject(&pool, "JSS1").await;

    for (day, period) in [(2, 1), (1, 2), (1, 1)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/timetable",
            Some(&token),
            Some(entry("JSS1", day, period, subject, None)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/timetable?class_name=JSS1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let slots: Vec<(i64, i64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["day_of_week"].as_i64().unwrap(), e["period"].as_i64().unwrap()))
        .collect();
    assert_eq!(slots, vec![(1, 1), (1, 2), (2, 1)]);

    let (_, body) = send(&app, "GET", "/api/timetable?day_of_week=2", Some(&token), None).await;
    assert_eq!(body["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_slot_conflict(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let subject = create_test_subject(&pool, "JSS1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS1", 3, 4, subject, None)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS1", 3, 4, subject, None)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_double_booking(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let subject = create_test_subject(&pool, "JSS1").await;
    let teacher = create_test_teacher(&pool).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS1", 1, 1, subject, Some(teacher))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS2", 1, 1, subject, Some(teacher))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Teacher"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_entries(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let subject = create_test_subject(&pool, "JSS1").await;

    let mut backwards = entry("JSS1", 1, 1, subject, None);
    backwards["end_time"] = json!("07:30:00");
    let (status, _) = send(&app, "POST", "/api/timetable", Some(&token), Some(backwards)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS1", 8, 1, subject, None)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS1", 1, 1, Uuid::new_v4(), None)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_merged_times_are_checked(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let subject = create_test_subject(&pool, "JSS1").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS1", 5, 2, subject, None)),
    )
    .await;
    let uri = format!("/api/timetable/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "start_time": "09:00:00" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "room": "Hall" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "Hall");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_reads_but_cannot_edit(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Student).await;
    let subject = create_test_subject(&pool, "JSS1").await;

    let (status, _) = send(&app, "GET", "/api/timetable", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/timetable",
        Some(&token),
        Some(entry("JSS1", 1, 1, subject, None)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
