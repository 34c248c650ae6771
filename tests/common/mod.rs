// Each integration test binary compiles this module separately and uses a
// different subset of the helpers.
#![allow(dead_code)]

//! Shared helpers for the integration tests.
//!
//! The tests need a reachable Postgres. When `DATABASE_URL` is unset (or the
//! database cannot be reached) each test logs a skip notice and returns early
//! instead of failing, so the suite stays green on machines without a test
//! database.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Connects to the test database, sets a JWT secret if none is configured,
/// and makes sure the schema exists. Returns `None` when no database is
/// available.
pub async fn try_pool() -> Option<PgPool> {
    dotenv::dotenv().ok();

    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping integration test: DATABASE_URL not set");
            return None;
        }
    };

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("skipping integration test: cannot connect to database: {}", e);
            return None;
        }
    };

    ensure_schema(&pool).await;
    Some(pool)
}

/// Applies the schema from `migrations/001_init.sql`, statement by statement.
/// Everything is idempotent so repeated test runs share one database.
async fn ensure_schema(pool: &PgPool) {
    let statements = [
        "CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
        "DO $$ BEGIN
            CREATE TYPE task_status AS ENUM ('PENDING', 'IN_PROGRESS', 'DONE');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$",
        "CREATE TABLE IF NOT EXISTS tasks (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            status task_status NOT NULL DEFAULT 'PENDING',
            due_date TIMESTAMPTZ,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
        "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .expect("failed to apply test schema");
    }
}

/// A unique throwaway email so parallel test runs never collide.
pub fn unique_email(prefix: &str) -> String {
    format!("{}+{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Removes a user and (via the FK cascade) their tasks.
pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

/// Auth details for a user registered during a test.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

/// Registers a user and logs them in through the API, returning the id from
/// the register response and the bearer token from the login response.
pub async fn register_and_login_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> TestUser {
    use actix_web::test;

    let req_register = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp_register = test::call_service(app, req_register).await;
    let register_status = resp_register.status();
    let register_body = test::read_body(resp_register).await;
    assert_eq!(
        register_status,
        actix_web::http::StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&register_body)
    );
    let user_json: serde_json::Value =
        serde_json::from_slice(&register_body).expect("register response was not JSON");
    let id: Uuid = user_json["id"]
        .as_str()
        .expect("register response missing id")
        .parse()
        .expect("register response id was not a uuid");

    let req_login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({
            "email": email,
            "password": password
        }))
        .to_request();
    let resp_login = test::call_service(app, req_login).await;
    let login_status = resp_login.status();
    let login_body = test::read_body(resp_login).await;
    assert_eq!(
        login_status,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&login_body)
    );
    let auth_response: tasktrack::auth::AuthResponse =
        serde_json::from_slice(&login_body).expect("login response was not JSON");

    TestUser {
        id,
        token: auth_response.token,
    }
}
