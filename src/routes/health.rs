use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

/// Health check endpoint
///
/// Pings the database and reports the API status with a timestamp.
/// Lives outside the authenticated scope.
#[get("/health")]
pub async fn health(pool: web::Data<PgPool>) -> impl Responder {
    let database_up = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
        .is_ok();

    HttpResponse::Ok().json(json!({
        "status": if database_up { "ok" } else { "degraded" },
        "database": if database_up { "up" } else { "down" },
        "timestamp": Utc::now()
    }))
}
