mod common;

use axum::http::StatusCode;
use common::{
    create_test_student, create_test_user, generate_unique_code, get_auth_token, login_as, send,
    setup_test_app,
};
use edudesk_core::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;
    let admission_number = generate_unique_code("ADM");

    let payload = json!({
        "admission_number": admission_number,
        "first_name": "Chidi",
        "last_name": "Okafor",
        "class_name": "JSS1",
        "section": "A",
        "date_of_birth": "2013-05-14"
    });
    let (status, body) = send(&app, "POST", "/api/students", Some(&token), Some(payload.clone())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["admission_number"], admission_number.as_str());
    assert_eq!(body["is_active"], true);

    let (status, _) = send(&app, "POST", "/api/students", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_validation(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "admission_number": "",
            "first_name": "Chidi",
            "last_name": "Okafor",
            "class_name": "JSS1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_subject_teacher_cannot_create_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::SubjectTeacher).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "admission_number": generate_unique_code("ADM"),
            "first_name": "Chidi",
            "last_name": "Okafor",
            "class_name": "JSS1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_by_class(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::ClassTeacher).await;
    create_test_student(&pool, "JSS1", None, None).await;
    create_test_student(&pool, "JSS1", None, None).await;
    create_test_student(&pool, "SS2", None, None).await;

    let (status, body) = send(&app, "GET", "/api/students?class_name=JSS1", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|s| s["class_name"] == "JSS1")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_sees_only_own_record(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let account = create_test_user(&pool, Role::Student).await;
    let own = create_test_student(&pool, "JSS2", Some(account.id), None).await;
    let other = create_test_student(&pool, "JSS2", None, None).await;
    let token = get_auth_token(&app, &account.email, &account.password).await;

    let (status, body) = send(&app, "GET", "/api/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], own.to_string());

    let (status, _) = send(&app, "GET", &format!("/api/students/{}", own), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/students/{}", other), Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_sees_children(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let parent = create_test_user(&pool, Role::Parent).await;
    create_test_student(&pool, "JSS1", None, Some(parent.id)).await;
    create_test_student(&pool, "SS1", None, Some(parent.id)).await;
    create_test_student(&pool, "SS1", None, None).await;
    let token = get_auth_token(&app, &parent.email, &parent.password).await;

    let (status, body) = send(&app, "GET", "/api/students", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;
    let id = create_test_student(&pool, "JSS3", None, None).await;
    let uri = format!("/api/students/{}", id);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "section": "B", "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["section"], "B");
    assert_eq!(body["is_active"], false);
    assert_eq!(body["class_name"], "JSS3");

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_teacher_cannot_delete_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::ClassTeacher).await;
    let id = create_test_student(&pool, "JSS3", None, None).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/students/{}", id), Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
