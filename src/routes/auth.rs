use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    services,
};
use actix_web::{post, web, HttpResponse, Responder};
use log::info;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns the created record (without the
/// password hash). Responds 409 when the email is already registered.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    info!("registering new user");
    let user = services::auth::register(
        &pool,
        &register_data.name,
        &register_data.email,
        &register_data.password,
    )
    .await?;
    info!("user registered: {}", user.id);

    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Verifies credentials and returns a bearer token. Responds 401 for an
/// unknown email or a wrong password.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    info!("logging in user");
    let token = services::auth::login(&pool, &login_data.email, &login_data.password).await?;
    info!("user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
