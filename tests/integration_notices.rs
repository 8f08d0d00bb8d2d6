mod common;

use axum::http::StatusCode;
use common::{login_as, send, setup_test_app};
use edudesk_core::Role;
use serde_json::{Value, json};
use sqlx::PgPool;

async fn publish(app: &axum::Router, token: &str, body: Value) -> Value {
    let (status, notice) = send(app, "POST", "/api/notices", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", notice);
    notice
}

fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_audience_controls_visibility(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (author, staff_token) = login_as(&app, &pool, Role::ClassTeacher).await;
    let (_, student_token) = login_as(&app, &pool, Role::Student).await;
    let (_, parent_token) = login_as(&app, &pool, Role::Parent).await;

    let notice = publish(
        &app,
        &staff_token,
        json!({ "title": "Sports day", "content": "Wear house colours", "audience": ["student"] }),
    )
    .await;
    assert_eq!(notice["published_by"], author.id.to_string());
    assert_eq!(notice["priority"], "normal");
    publish(
        &app,
        &staff_token,
        json!({ "title": "Resumption", "content": "School resumes Monday" }),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/notices", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let seen = titles(&body);
    assert!(seen.contains(&"Sports day".to_string()));
    assert!(seen.contains(&"Resumption".to_string()));

    let (_, body) = send(&app, "GET", "/api/notices", Some(&parent_token), None).await;
    assert_eq!(titles(&body), vec!["Resumption".to_string()]);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/notices/{}", notice["id"].as_str().unwrap()),
        Some(&parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_future_and_inactive_notices_are_hidden(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, admin_token) = login_as(&app, &pool, Role::Admin).await;
    let (_, reader_token) = login_as(&app, &pool, Role::Accountant).await;

    publish(
        &app,
        &admin_token,
        json!({ "title": "Expired", "content": "x", "expires_at": "2020-01-01T00:00:00Z" }),
    )
    .await;
    publish(
        &app,
        &admin_token,
        json!({ "title": "Scheduled", "content": "x", "publish_date": "2099-01-01T00:00:00Z" }),
    )
    .await;
    publish(
        &app,
        &admin_token,
        json!({ "title": "Draft", "content": "x", "is_active": false }),
    )
    .await;
    publish(&app, &admin_token, json!({ "title": "Live", "content": "x" })).await;

    let (_, body) = send(&app, "GET", "/api/notices", Some(&reader_token), None).await;
    assert_eq!(titles(&body), vec!["Live".to_string()]);

    // notice admins see everything
    let (_, body) = send(&app, "GET", "/api/notices", Some(&admin_token), None).await;
    assert_eq!(body["meta"]["total"], 4);

    let (_, body) = send(&app, "GET", "/api/notices?is_active=false", Some(&admin_token), None).await;
    assert_eq!(titles(&body), vec!["Draft".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_publish(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Student).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/notices",
        Some(&token),
        Some(json!({ "title": "Free day", "content": "No school" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_notice(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;
    let notice = publish(&app, &token, json!({ "title": "PTA", "content": "Friday" })).await;
    let uri = format!("/api/notices/{}", notice["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "priority": "urgent", "audience": ["parent"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priority"], "urgent");
    assert_eq!(body["audience"], json!(["parent"]));
    assert_eq!(body["title"], "PTA");

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
