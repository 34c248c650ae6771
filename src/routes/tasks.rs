//! Task endpoints.
//!
//! Thin wrappers over `services::tasks`: deserialize and validate the request,
//! pull the caller's identity from the `AuthenticatedUser` extractor, call the
//! service, serialize the result. Operation logging happens here so the core
//! stays free of observability concerns.

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskPatch, TaskQuery},
    services,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status` (optional): exact status match (`PENDING`, `IN_PROGRESS`, `DONE`).
/// - `search` (optional): substring match against title or description.
/// - `page` (optional, default 1), `limit` (optional, default 10): pagination.
///
/// ## Responses:
/// - `200 OK`: `{data, page, limit, total, totalPages}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: `page` or `limit` below 1.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    query_params.validate()?;

    info!("listing tasks for user {}", user.id);
    let page = services::tasks::find_all(&pool, user.id, &query_params).await?;
    info!("found {} tasks for user {}", page.total, user.id);

    Ok(HttpResponse::Ok().json(page))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// `title` (required), `description` (optional), `status` (optional, defaults
/// to `PENDING`), `due_date` (optional).
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: validation failure (e.g. empty title).
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    info!("creating task for user {}", user.id);
    let task = services::tasks::create(&pool, user.id, task_data.into_inner()).await?;
    info!("task created: {}", task.id);

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task by id.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the task exists but belongs to another user.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    info!("fetching task for user {}", user.id);
    let task = services::tasks::find_one(&pool, task_id.into_inner(), user.id).await?;
    info!("task found: {}", task.id);

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task the authenticated user owns.
///
/// Only provided fields change; omitted fields keep their prior value.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the task exists but belongs to another user.
/// - `404 Not Found`: no task with that id.
/// - `422 Unprocessable Entity`: validation failure.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    info!("updating task for user {}", user.id);
    let task =
        services::tasks::update(&pool, task_id.into_inner(), user.id, task_data.into_inner())
            .await?;
    info!("task updated: {}", task.id);

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the authenticated user owns.
///
/// ## Responses:
/// - `200 OK`: the deleted task's last-known state.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the task exists but belongs to another user.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    info!("deleting task for user {}", user.id);
    let task = services::tasks::delete(&pool, task_id.into_inner(), user.id).await?;
    info!("task deleted: {}", task.id);

    Ok(HttpResponse::Ok().json(task))
}
