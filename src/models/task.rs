use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Status of the new task. Defaults to `PENDING` when omitted.
    #[serde(default)]
    pub status: TaskStatus,

    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for an existing task. Omitted fields keep their prior value.
///
/// The owner is deliberately absent: ownership cannot be transferred through
/// an update.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub due_date: Option<DateTime<Utc>>,
}

/// A task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// The current status of the task.
    pub status: TaskStatus,
    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task.
    pub user_id: Uuid,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Query parameters for listing tasks.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskQuery {
    /// Filter tasks by exact status.
    pub status: Option<TaskStatus>,
    /// Substring to match against title or description.
    pub search: Option<String>,
    /// 1-based page number. Defaults to 1.
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,
    /// Page size. Defaults to 10.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub limit: i64,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// One page of a user's tasks plus pagination metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPage {
    pub data: Vec<Task>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}
