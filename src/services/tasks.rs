//! Ownership-scoped task persistence.
//!
//! Every operation takes the caller's resolved user id and either scopes its
//! query to that owner (`find_all`, `create`) or goes through `find_one`, the
//! single load-and-authorize primitive, before touching a row (`update`,
//! `delete`). A task belonging to another user is never returned or mutated.

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPage, TaskPatch, TaskQuery};
use sqlx::PgPool;
use uuid::Uuid;

const TASK_COLUMNS: &str = "id, title, description, status, due_date, user_id, created_at, updated_at";

fn total_pages(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Creates a task owned by `user_id`.
///
/// The owner always comes from the resolved identity, never from the request
/// body. An empty or whitespace-only title is rejected here even though the
/// transport layer validates it too.
pub async fn create(pool: &PgPool, user_id: Uuid, input: TaskInput) -> Result<Task, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::ValidationError("Title must not be empty".into()));
    }

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (id, title, description, status, due_date, user_id) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.status)
    .bind(input.due_date)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Lists the caller's tasks with optional status and search filters, newest
/// first, as one page plus pagination metadata.
///
/// `search` matches the term as a substring of title OR description
/// (case-insensitive via ILIKE). `total` counts all matching rows regardless
/// of the requested page; a page past the end yields an empty `data` array,
/// not an error.
pub async fn find_all(
    pool: &PgPool,
    user_id: Uuid,
    query: &TaskQuery,
) -> Result<TaskPage, AppError> {
    // WHERE clause assembled once and shared by the count and data queries so
    // `total`/`totalPages` always describe the same row set.
    let mut conditions = vec!["user_id = $1".to_string()];
    let mut param_count = 2;

    if query.status.is_some() {
        conditions.push(format!("status = ${}", param_count));
        param_count += 1;
    }
    if query.search.is_some() {
        conditions.push(format!(
            "(title ILIKE ${} OR description ILIKE ${})",
            param_count,
            param_count + 1
        ));
        param_count += 2;
    }

    let where_clause = conditions.join(" AND ");

    let count_sql = format!("SELECT COUNT(*) FROM tasks WHERE {where_clause}");
    let select_sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE {where_clause} \
         ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
        param_count,
        param_count + 1
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(user_id);
    let mut select_query = sqlx::query_as::<_, Task>(&select_sql).bind(user_id);

    if let Some(status) = &query.status {
        count_query = count_query.bind(status);
        select_query = select_query.bind(status);
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        count_query = count_query.bind(pattern.clone()).bind(pattern.clone());
        select_query = select_query.bind(pattern.clone()).bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;

    let tasks = select_query
        .bind(query.limit)
        .bind((query.page - 1) * query.limit)
        .fetch_all(pool)
        .await?;

    Ok(TaskPage {
        data: tasks,
        page: query.page,
        limit: query.limit,
        total,
        total_pages: total_pages(total, query.limit),
    })
}

/// Loads a task and authorizes the caller against it.
///
/// Fails with `NotFound` when the id does not exist and `Forbidden` when it
/// exists under a different owner. Existence is confirmed before ownership,
/// so the two outcomes stay distinguishable. `update` and `delete` compose
/// on this instead of re-running their own checks.
pub async fn find_one(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Task with id {} not found", id)))?;

    if task.user_id != user_id {
        return Err(AppError::Forbidden("Access denied".into()));
    }

    Ok(task)
}

/// Applies a partial update to a task the caller owns.
///
/// Omitted patch fields keep their prior values; the owner is not a patch
/// field, so ownership cannot be transferred. The UPDATE itself is scoped to
/// the owner as well, so a row that changed hands between the authorize step
/// and the write is not touched (it surfaces as `NotFound`).
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    patch: TaskPatch,
) -> Result<Task, AppError> {
    let current = find_one(pool, id, user_id).await?;

    let title = match patch.title {
        Some(title) => {
            if title.trim().is_empty() {
                return Err(AppError::ValidationError("Title must not be empty".into()));
            }
            title
        }
        None => current.title,
    };
    let description = patch.description.or(current.description);
    let status = patch.status.unwrap_or(current.status);
    let due_date = patch.due_date.or(current.due_date);

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET title = $1, description = $2, status = $3, due_date = $4, updated_at = now() \
         WHERE id = $5 AND user_id = $6 \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&title)
    .bind(&description)
    .bind(&status)
    .bind(due_date)
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Deletes a task the caller owns and returns its last-known state.
pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Task, AppError> {
    let task = find_one(pool, id, user_id).await?;

    sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 2), 2);
        assert_eq!(total_pages(4, 2), 2);
        assert_eq!(total_pages(1, 1), 1);
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        // The merge logic mirrored here: None keeps prior values.
        let prior_description = Some("keep me".to_string());
        let patch = TaskPatch {
            title: None,
            description: None,
            status: Some(TaskStatus::Done),
            due_date: None,
        };
        let merged_description = patch.description.or(prior_description.clone());
        assert_eq!(merged_description, prior_description);
        assert_eq!(patch.status.unwrap_or(TaskStatus::Pending), TaskStatus::Done);
    }
}
