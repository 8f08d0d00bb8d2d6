mod common;

use axum::http::StatusCode;
use common::{create_test_user, generate_unique_email, login_as, send, setup_test_app};
use edudesk_core::Role;
use serde_json::json;
use sqlx::PgPool;

fn new_user(role: &str) -> serde_json::Value {
    json!({
        "first_name": "Ada",
        "last_name": "Obi",
        "email": generate_unique_email(),
        "password": "password123",
        "role": role
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_creates_user(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;

    let payload = new_user("accountant");
    let (status, body) = send(&app, "POST", "/api/users", Some(&token), Some(payload.clone())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], payload["email"]);
    assert_eq!(body["role"], "accountant");
    assert!(body.get("password").is_none());

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE email = $1")
        .bind(payload["email"].as_str().unwrap())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(stored, "password123");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;

    let payload = new_user("student");
    let (status, _) = send(&app, "POST", "/api/users", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", "/api/users", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_super_admin_creates_super_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, admin_token) = login_as(&app, &pool, Role::Admin).await;
    let (_, super_token) = login_as(&app, &pool, Role::SuperAdmin).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(&admin_token),
        Some(new_user("super_admin")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(&super_token),
        Some(new_user("super_admin")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_modify_super_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let target = create_test_user(&pool, Role::SuperAdmin).await;
    let (_, token) = login_as(&app, &pool, Role::Admin).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", target.id),
        Some(&token),
        Some(json!({ "first_name": "Changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", target.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_principal_reads_but_cannot_write(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;

    let (status, body) = send(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["meta"]["total"].as_i64().unwrap() >= 1);

    let (status, _) = send(&app, "POST", "/api/users", Some(&token), Some(new_user("parent"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_has_no_user_access(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::ClassTeacher).await;

    let (status, _) = send(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_by_role_and_paginates(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    for _ in 0..3 {
        create_test_user(&pool, Role::Parent).await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/users?role=parent&limit=2&page=1",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|u| u["role"] == "parent")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_rehashes_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let target = create_test_user(&pool, Role::Student).await;
    let (_, token) = login_as(&app, &pool, Role::Admin).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", target.id),
        Some(&token),
        Some(json!({ "password": "another-pass-1", "phone": "0800" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "0800");

    common::get_auth_token(&app, &target.email, "another-pass-1").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_cannot_delete_self(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin, token) = login_as(&app, &pool, Role::Admin).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", admin.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_and_get_missing_user(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let target = create_test_user(&pool, Role::Parent).await;
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let uri = format!("/api/users/{}", target.id);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
