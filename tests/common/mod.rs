use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use edudesk::router::init_router;
use edudesk::state::init_app_state;
use edudesk_core::{Role, hash_password};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    init_router(init_app_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_code(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

pub async fn create_test_user(pool: &PgPool, role: Role) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO users (first_name, last_name, email, password, role)
           VALUES ('Test', 'User', $1, $2, $3)
           RETURNING id"#,
    )
    .bind(&email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email,
        password: TEST_PASSWORD.to_string(),
        role,
    }
}

#[allow(dead_code)]
pub async fn create_test_student(
    pool: &PgPool,
    class_name: &str,
    user_id: Option<Uuid>,
    parent_user_id: Option<Uuid>,
) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO students (admission_number, first_name, last_name, class_name, section,
                                 user_id, parent_user_id)
           VALUES ($1, 'Test', 'Student', $2, 'A', $3, $4)
           RETURNING id"#,
    )
    .bind(generate_unique_code("ADM"))
    .bind(class_name)
    .bind(user_id)
    .bind(parent_user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_subject(pool: &PgPool, class_name: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO subjects (name, code, class_name) VALUES ('Mathematics', $1, $2) RETURNING id",
    )
    .bind(generate_unique_code("MTH"))
    .bind(class_name)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_teacher(pool: &PgPool) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO teachers (employee_id, first_name, last_name, email)
           VALUES ($1, 'Test', 'Teacher', $2)
           RETURNING id"#,
    )
    .bind(generate_unique_code("EMP"))
    .bind(generate_unique_email())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn get_auth_token(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

/// Creates a user with `role` and returns a bearer token for it.
#[allow(dead_code)]
pub async fn login_as(app: &Router, pool: &PgPool, role: Role) -> (TestUser, String) {
    let user = create_test_user(pool, role).await;
    let token = get_auth_token(app, &user.email, &user.password).await;
    (user, token)
}
