//! Account registration and credential verification.
//!
//! Owns the two invariants of the credential store: no two users share an
//! email, and raw passwords never touch disk or logs (only the bcrypt hash
//! is persisted).

use crate::auth::{generate_token, hash_password, verify_password};
use crate::error::AppError;
use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Creates a new account.
///
/// Fails with `AppError::Conflict` when the email is already registered.
/// The duplicate check is case-sensitive, matching emails exactly as stored;
/// a concurrent insert that slips past it still surfaces as `Conflict` via
/// the unique constraint on `users.email`.
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let existing = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, password_hash) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, name, email, password_hash, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Verifies credentials and issues a signed token embedding the user's id
/// and email.
///
/// Unknown email and wrong password both surface as the same
/// `AppError::Unauthorized` message; no session state is kept server-side.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<String, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    generate_token(user.id, &user.email)
}
