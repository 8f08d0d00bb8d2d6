mod common;

use axum::http::StatusCode;
use common::{login_as, send, setup_test_app};
use edudesk_core::Role;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_roles_lists_all_nine(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Student).await;

    let (status, body) = send(&app, "GET", "/api/permissions/roles", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let roles = body.as_array().unwrap();
    assert_eq!(roles.len(), 9);
    assert_eq!(roles[0]["role"], "student");
    assert_eq!(roles[8]["role"], "super_admin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_modules_lists_synced_catalogue(pool: PgPool) {
    edudesk_db::sync_modules(&pool).await.unwrap();
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Admin).await;

    let (status, body) = send(&app, "GET", "/api/permissions/modules", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["key"].as_str().unwrap())
        .collect();
    assert!(keys.contains(&"students"));
    assert!(keys.contains(&"admissions"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sync_modules_is_idempotent(pool: PgPool) {
    let first = edudesk_db::sync_modules(&pool).await.unwrap();
    let second = edudesk_db::sync_modules(&pool).await.unwrap();
    assert_eq!(first.modules, second.modules);
    assert_eq!(first.role_modules, second.role_modules);
    assert_eq!(second.removed, 0);

    let grants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role_modules")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(grants as usize, second.role_modules);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_permissions(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Parent).await;

    let (status, body) = send(&app, "GET", "/api/permissions/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "parent");
    let modules = body["modules"].as_array().unwrap();
    assert!(modules.iter().any(|m| m["module"] == "results"));
    assert!(modules.iter().all(|m| m["module"] != "users"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_permission(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Student).await;

    let cases = [
        ("role=accountant&module=fees&level=admin", true),
        ("role=student&module=fees&level=write", false),
        ("role=student&module=submissions&level=write", true),
        ("role=headmaster&module=fees&level=read", false),
        ("role=admin&module=canteen&level=read", false),
        ("module=fees&level=read", false),
    ];

    for (query, expected) in cases {
        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/permissions/check?{}", query),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allowed"], expected, "{}", query);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_matrix_covers_every_role(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = login_as(&app, &pool, Role::Principal).await;

    let (status, body) = send(&app, "GET", "/api/permissions/matrix", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let matrix = body.as_array().unwrap();
    assert_eq!(matrix.len(), 9);
    let super_admin = matrix.iter().find(|r| r["role"] == "super_admin").unwrap();
    assert!(
        super_admin["modules"]
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["levels"].as_array().unwrap().contains(&"admin".into()))
    );
}
