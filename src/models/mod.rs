pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskPage, TaskPatch, TaskQuery, TaskStatus};
pub use user::User;
